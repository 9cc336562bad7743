use std::path::Path;

use quire::config::{CONFIG_FILE, Settings};

use crate::InitArgs;

const INDEX_PAGE: &str = "/*
Title: Welcome
Description: A fresh quire site
*/

# Welcome

Edit `content/index.md` to change this page. Add more pages next to it and
they show up in `pages` in the theme.
";

const NOT_FOUND_PAGE: &str = "/*
Title: Error 404
Robots: noindex,nofollow
*/

# Error 404

Woops. Looks like this page doesn't exist. Go back [home](%base_url%/).
";

const THEME_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{% if meta.title %}{{ meta.title }} | {% endif %}{{ site_title }}</title>
  {% if meta.description %}<meta name="description" content="{{ meta.description }}">{% endif %}
  {% if meta.robots %}<meta name="robots" content="{{ meta.robots }}">{% endif %}
</head>
<body>
  <header><a href="{{ base_url }}/">{{ site_title }}</a></header>
  <nav>
    <ul>
    {% for page in pages %}
      <li><a href="{{ page.url }}">{{ page.title }}</a></li>
    {% endfor %}
    </ul>
  </nav>
  <main>{{ content }}</main>
  <footer>
    {% if prev_page %}<a href="{{ prev_page.url }}">&larr; {{ prev_page.title }}</a>{% endif %}
    {% if next_page %}<a href="{{ next_page.url }}">{{ next_page.title }} &rarr;</a>{% endif %}
  </footer>
</body>
</html>
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(anyhow::anyhow!(
            "A site already exists here: {config_file}",
            config_file = config_path.display()
        ));
    }

    println!("Initializing site in {}", path.display());

    let settings = Settings {
        site_title: "My quire site".into(),
        base_url: "http://localhost:3000".into(),
        ..Settings::default()
    };
    let config_text = serde_yaml::to_string(&settings)?;
    tokio::fs::write(&config_path, config_text).await?;

    let content_dir = path.join(&settings.content_dir);
    let theme_dir = path.join(&settings.theme);
    let plugins_dir = path.join(&settings.plugins_dir);
    tokio::fs::create_dir_all(&content_dir).await?;
    tokio::fs::create_dir_all(&theme_dir).await?;
    tokio::fs::create_dir_all(&plugins_dir).await?;

    write_file(&content_dir.join(format!("index{}", settings.content_ext)), INDEX_PAGE).await?;
    write_file(&content_dir.join(format!("404{}", settings.content_ext)), NOT_FOUND_PAGE).await?;
    write_file(&theme_dir.join("index.html"), THEME_INDEX).await?;
    // An empty unit enables the plugin with default options
    write_file(&plugins_dir.join("custom404.yaml"), "").await?;

    println!(
        "Created config file {config_file}",
        config_file = config_path.display()
    );
    println!("Run `quire --site {} serve` to preview it", path.display());

    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<(), anyhow::Error> {
    tokio::fs::write(path, contents).await?;
    println!("Created {}", path.display());
    Ok(())
}
