use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::get,
    Router,
    extract::State,
    response::Html,
};
use log::{info, error};
use tera::{Context, Tera};

const PAGE_TEMPLATE: &str = include_str!("page.html");

/// Renders the chat page. The page talks to the WebSocket endpoint on `ws_port`
/// of whatever host it was loaded from.
pub fn render_page(title: &str, ws_port: u16) -> Result<String, tera::Error> {
    // Registered under an .html name so tera autoescapes the title.
    let mut tera = Tera::default();
    tera.add_raw_template("page.html", PAGE_TEMPLATE)?;

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("ws_port", &ws_port);
    tera.render("page.html", &context)
}

pub fn router(page: String) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .with_state(Arc::new(page))
}

async fn page_handler(State(page): State<Arc<String>>) -> Html<String> {
    Html(page.as_str().to_owned())
}

pub async fn start_http_server(
    addr: SocketAddr,
    page: String,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Chat page served on: http://{}", listener.local_addr()?);

    let app = router(page);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.into_make_service()).await {
            error!("HTTP server error: {}", e);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn page_contains_fixed_ui_elements() {
        let page = render_page("Chatbot TP Final Base de Datos", 4000).unwrap();
        assert!(page.contains("<h1>Chatbot TP Final Base de Datos</h1>"));
        assert!(page.contains("Escribe tu mensaje:"));
        assert!(page.contains("Enviar"));
        assert!(page.contains("DEEPSEEK_API_KEY"));
        assert!(page.contains(":4000/"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn title_is_escaped() {
        let page = render_page("<script>x</script>", 4000).unwrap();
        assert!(page.contains("&lt;script&gt;x&lt;&#x2F;script&gt;"));
        assert!(!page.contains("<h1><script>"));
    }

    #[tokio::test]
    async fn root_serves_the_page() {
        let app = router(render_page("Chat", 4001).unwrap());
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<h1>Chat</h1>"));
        assert!(html.contains(":4001/"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let app = router(render_page("Chat", 4001).unwrap());
        let resp = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
