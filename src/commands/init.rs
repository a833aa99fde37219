use crate::{
    InitArgs,
    config::{Config, SiteConfig},
};

/// Default post layout written by `folio init`.
const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page.title }} &mdash; {{ site.title }}</title>
  <meta name="title" content="{{ page.title }}">
  {% if page.description %}<meta name="description" content="{{ page.description }}">{% endif %}
</head>
<body>
  <header><a href="/">{{ site.title }}</a></header>
  <main>
    <article>
      <h1>{{ page.title }}</h1>
      <p><time datetime="{{ page.date }}">{{ page.date }}</time></p>
      {% if page.tags %}<ul class="tags">{% for tag in page.tags %}<li>{{ tag }}</li>{% endfor %}</ul>{% endif %}
      {{ content | safe }}
    </article>
  </main>
  {% if folio.live_reload %}<script>new EventSource("/_folio/live-reload").addEventListener("reload", () => location.reload());</script>{% endif %}
</body>
</html>
"#;

/// Default index template written by `folio init`.
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ site.title }}</title>
  {% if site.description %}<meta name="description" content="{{ site.description }}">{% endif %}
</head>
<body>
  <header>{{ site.title }}</header>
  <main>
    {% if site.description %}<p>{{ site.description }}</p>{% endif %}
    <ul class="posts">
      {% for post in posts %}
      <li>
        <time datetime="{{ post.date }}">{{ post.date }}</time>
        <a href="{{ post.url }}">{{ post.title }}</a>
      </li>
      {% endfor %}
    </ul>
  </main>
  {% if folio.live_reload %}<script>new EventSource("/_folio/live-reload").addEventListener("reload", () => location.reload());</script>{% endif %}
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

    let default_config = Config {
        site: SiteConfig {
            title: "My Folio Site".into(),
            url: Some("https://my-folio-site.com".into()),
            description: Some("Notes and essays".into()),
            author: None,
        },
        content: "posts".into(),
        templates: "templates".into(),
        output: "_site".into(),
        theme: Default::default(),
        markdown: Default::default(),
        feed: Default::default(),
        dev: Default::default(),
    };

    println!("Initializing site in {}", path.display());

    let config_text = serde_yaml::to_string(&default_config)?;
    tokio::fs::write(path.join("folio.yaml"), config_text).await?;

    tokio::fs::create_dir_all(path.join("templates")).await?;
    tokio::fs::write(path.join("templates/post.html"), POST_TEMPLATE).await?;
    tokio::fs::write(path.join("templates/index.html"), INDEX_TEMPLATE).await?;

    tokio::fs::create_dir_all(path.join("posts")).await?;
    let today = chrono::Utc::now().format("%Y-%m-%d");
    let sample_post = format!(
        "---\ntitle: Hello, Folio\ndate: {today}\ntags: [meta]\n---\n\nThis is your first post. Edit it, add more files to `posts/`,\nand run `folio build`.\n"
    );
    tokio::fs::write(path.join("posts/hello-folio.md"), sample_post).await?;

    println!(
        "Created config file {config_file}",
        config_file = path.join("folio.yaml").display()
    );
    println!("Created default templates and a sample post");

    Ok(())
}
