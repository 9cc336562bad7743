use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use tower_http::services::ServeDir;
use tracing::{error, info};

use quire::Site;
use quire::pipeline::PageStatus;
use quire::util::path_str;

use crate::ServeArgs;

/// Render any route that is not a theme asset.
async fn page_handler(State(site): State<Arc<Site>>, uri: Uri) -> Response {
    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let route = request_uri.clone();
    let rendered = tokio::task::spawn_blocking(move || site.render(&request_uri)).await;

    match rendered {
        Ok(Ok(outcome)) => {
            let status = match outcome.status {
                PageStatus::Ok => StatusCode::OK,
                PageStatus::NotFound => StatusCode::NOT_FOUND,
            };
            info!(
                route = %route,
                status = status.as_u16(),
                template = %outcome.template,
                "served page"
            );
            (status, Html(outcome.body)).into_response()
        }
        Ok(Err(e)) => {
            error!(route = %route, error = %e, "failed to render page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render page: {e}"),
            )
                .into_response()
        }
        Err(e) => {
            error!(route = %route, error = %e, "render task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn run(
    site_root: &Path,
    overrides: Vec<(String, String)>,
    args: &ServeArgs,
) -> Result<(), anyhow::Error> {
    let site = Arc::new(Site::open(site_root, overrides)?);

    // Theme assets live under the theme's path relative to the site root
    let theme_mount = format!("/{}", path_str(&site.settings().theme).trim_matches('/'));
    let mut app = Router::new();
    if theme_mount != "/" {
        app = app.nest_service(&theme_mount, ServeDir::new(site.theme_dir()));
    }
    let app = app.fallback(page_handler).with_state(site.clone());

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    // Determine the URL to display
    let display_host = if args.bind == "0.0.0.0" {
        "localhost"
    } else {
        &args.bind
    };
    let url = format!("http://{}:{}", display_host, args.port);

    info!(%addr, root = %site.root().display(), "starting server");
    println!("\nServing site at {}", url);
    println!("Press Ctrl+C to stop\n");

    // Open browser if requested
    if args.open
        && let Err(e) = open::that(&url)
    {
        eprintln!("Failed to open browser: {}", e);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
