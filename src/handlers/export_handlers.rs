use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::errors::AppError;
use crate::models::acta::{ParticipantExportRow, ResponseExportRow};
use crate::store::Store;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// GET /bajartext: one `rut;nombre;apellido;comuna;fecha` line per participation.
pub async fn participants<S: Store + 'static>(store: web::Data<S>) -> Result<HttpResponse, AppError> {
    let rows = store.export_participants().await?;
    log::info!("Exporting {} participant rows", rows.len());
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(participants_text(&rows)))
}

/// GET /bajartodo: every stored response as CSV.
pub async fn responses<S: Store + 'static>(store: web::Data<S>) -> Result<HttpResponse, AppError> {
    let rows = store.export_responses().await?;
    log::info!("Exporting {} response rows", rows.len());
    let filename = format!("actas-{}.csv", Utc::now().format("%Y%m%d"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{filename}\"")))
        .body(responses_csv(&rows)))
}

fn participants_text(rows: &[ParticipantExportRow]) -> String {
    let mut out = String::new();
    for r in rows {
        out.push_str(&format!(
            "{};{};{};{};{}\n",
            r.rut,
            r.nombre,
            r.apellido,
            r.comuna,
            r.fecha.format(DATE_FORMAT)
        ));
    }
    out
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn responses_csv(rows: &[ResponseExportRow]) -> String {
    let mut csv = String::from("acta_id,fecha,region,provincia,comuna,grupo,item,categoria,fundamento\n");
    for r in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            r.acta_id,
            r.fecha.format(DATE_FORMAT),
            escape_csv(&r.region),
            escape_csv(&r.provincia),
            escape_csv(&r.comuna),
            escape_csv(&r.grupo),
            escape_csv(&r.item),
            r.categoria,
            escape_csv(r.fundamento.as_deref().unwrap_or_default()),
        ));
    }
    csv
}
