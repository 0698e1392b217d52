use askama::Template;

pub const APP_NAME: &str = "Encuentros Locales";

/// Context shared by every page: the site name and which nav link is active.
pub struct PageContext {
    pub app_name: String,
    pub current_path: String,
}

impl PageContext {
    pub fn new(current_path: &str) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            current_path: current_path.to_string(),
        }
    }

    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
}

#[derive(Template)]
#[template(path = "lista.html")]
pub struct ListaTemplate {
    pub ctx: PageContext,
}

#[derive(Template)]
#[template(path = "subir.html")]
pub struct SubirTemplate {
    pub ctx: PageContext,
    pub csrf_token: String,
    /// Encuentro type whose `/base/<id>` skeleton the form loads.
    pub encuentro: i64,
}
