use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel::PgConnection;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn create_conn(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().build(manager)
}

/// Common shell for the server-rendered views.
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
<html lang=\"en\">\
<head>\
<meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title>\
<style>\
body{{font-family:system-ui,sans-serif;margin:0;background:#f8f9fa;color:#212529}}\
nav{{background:#fff;border-bottom:1px solid #dee2e6;padding:12px 20px}}\
nav a{{margin-right:16px;color:#0d6efd;text-decoration:none;font-weight:500}}\
main{{max-width:720px;margin:24px auto;padding:0 16px}}\
.card{{background:#fff;border:1px solid #dee2e6;border-radius:8px;padding:16px;margin-bottom:12px;box-shadow:2px 2px 6px #eee}}\
.badge{{display:inline-block;padding:4px 10px;margin-right:8px;border-radius:12px;color:#fff;font-size:0.85rem}}\
.badge-danger{{background:#e53935}}\
.badge-warning{{background:#fb8c00}}\
.badge-success{{background:#43a047}}\
.badge-info{{background:#90caf9;color:#0d47a1}}\
.badge-muted{{background:#e1bee7;color:#6a1b9a}}\
button{{padding:8px 16px;border:0;border-radius:6px;background:#ffc107;font-weight:600;cursor:pointer}}\
button:disabled{{opacity:.6;cursor:default}}\
input,textarea,select{{padding:8px;border:1px solid #ced4da;border-radius:6px;width:100%;box-sizing:border-box;margin-bottom:8px}}\
.callout{{background:#fef3c7;border:1px solid #facc15;border-radius:6px;padding:1rem;margin-top:1.5rem;color:#78350f;white-space:pre-wrap}}\
</style>\
</head>\
<body>\
<nav>\
<a href=\"/voice\">Voice</a>\
<a href=\"/chat\">Chat</a>\
<a href=\"/tickets\">Tickets</a>\
<a href=\"/billing\">Billing</a>\
<a href=\"/auth\">Login</a>\
</nav>\
<main>{body}</main>\
</body>\
</html>"
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#x27;b&#x27;&lt;/b&gt;"
        );
    }
}
