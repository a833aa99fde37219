use crate::{
    BuildArgs,
    build::{BuildResult, Builder, base_path_from_config},
    config::Config,
};

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    // Determine the config file path
    let config_path = args
        .config_file
        .clone()
        .unwrap_or_else(|| "folio.yaml".into());
    let config_path = if config_path.is_relative() {
        std::env::current_dir()?.join(&config_path)
    } else {
        config_path
    };

    let config = Config::load_from_arg(Some(config_path.as_path())).await?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path);
    let result = builder.build()?;

    report(&result);

    Ok(())
}

/// Print the build summary, with per-document failures on stderr.
pub fn report(result: &BuildResult) {
    println!(
        "Built site to {} ({} posts, {} static files{})",
        result.output_dir.display(),
        result.posts,
        result.static_files,
        if result.drafts > 0 {
            format!(", {} drafts skipped", result.drafts)
        } else {
            String::new()
        }
    );

    if !result.failures.is_empty() {
        eprintln!("\n{} document(s) failed:", result.failures.len());
        for failure in &result.failures {
            eprintln!("  {failure}");
        }
    }
}
