use std::path::Path;

use quire::Site;
use quire::pipeline::PageStatus;
use tracing::warn;

use crate::RenderArgs;

pub async fn run(
    site_root: &Path,
    overrides: Vec<(String, String)>,
    args: &RenderArgs,
) -> Result<(), anyhow::Error> {
    let site_root = site_root.to_path_buf();
    let route = args.route.clone();

    // Rendering reads the content tree synchronously
    let outcome = tokio::task::spawn_blocking(move || {
        let site = Site::open(&site_root, overrides)?;
        Ok::<_, anyhow::Error>(site.render(&route)?)
    })
    .await??;

    if outcome.status == PageStatus::NotFound {
        warn!(route = %args.route, "no content for route, rendered the not-found page");
    }

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &outcome.body).await?;
            println!(
                "Rendered {route} with template '{template}' to {path}",
                route = args.route,
                template = outcome.template,
                path = path.display()
            );
        }
        None => print!("{}", outcome.body),
    }

    Ok(())
}
