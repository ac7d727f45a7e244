//! Page templates and built-in fallback pages.

use crate::controller::view::escape_html;

/// Served instead of the embed page when the template file cannot be read.
pub const TEMPLATE_MISSING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Games Analytics - Dashboard BI</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <div class="error-container">
        <h1>Erro: Template não encontrado</h1>
        <p>O arquivo templates/index.html não foi encontrado.</p>
    </div>
</body>
</html>"#;

pub const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>404 - Page Not Found</title>
    <style>
        body { font-family: system-ui; text-align: center; padding: 50px; background: #f5f5f5; }
        .error-container { max-width: 400px; margin: 0 auto; }
        h1 { color: #e53e3e; }
    </style>
</head>
<body>
    <div class="error-container">
        <h1>404</h1>
        <p>Página não encontrada</p>
        <a href="/">Voltar ao Dashboard</a>
    </div>
</body>
</html>"#;

/// Page shown when the embed page could not be prepared, e.g. token minting failed.
pub fn server_error_page(details: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Erro - Games Analytics</title>
    <style>
        body {{ font-family: system-ui; text-align: center; padding: 50px; background: #f5f5f5; }}
        .error-container {{ max-width: 500px; margin: 0 auto; background: white; padding: 2rem; border-radius: 8px; box-shadow: 0 4px 20px rgba(0,0,0,0.1); }}
        h1 {{ color: #e53e3e; }}
        .error-details {{ background: #f7fafc; padding: 1rem; border-radius: 4px; margin: 1rem 0; font-family: monospace; }}
    </style>
</head>
<body>
    <div class="error-container">
        <h1>Erro no Servidor</h1>
        <p>Não foi possível carregar o dashboard.</p>
        <div class="error-details">{}</div>
        <button onclick="location.reload()">Tentar Novamente</button>
    </div>
</body>
</html>"#,
        escape_html(details)
    )
}

/// A `{{NAME}}` placeholder value.
pub enum Substitution<'a> {
    /// Escaped before insertion.
    Text(&'a str),
    /// Inserted verbatim.
    Markup(&'a str),
}

/// Replaces every `{{NAME}}` placeholder. Unknown placeholders are left as-is.
pub fn render_template(template: &str, values: &[(&str, Substitution<'_>)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in values {
        let placeholder = format!("{{{{{}}}}}", name);
        let value = match value {
            Substitution::Text(text) => escape_html(text),
            Substitution::Markup(markup) => markup.to_string(),
        };
        rendered = rendered.replace(&placeholder, &value);
    }
    rendered
}
