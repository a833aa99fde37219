use crate::{CleanArgs, build::base_path_from_config, config::Config};

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
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

    // Delete the generated site folder
    let output = if config.output.is_relative() {
        base_path.join(&config.output)
    } else {
        config.output.clone()
    };
    let output = output.canonicalize().unwrap_or(output);

    if output.exists() {
        if args.dry_run {
            println!("Would delete {}", output.display());
        } else {
            tokio::fs::remove_dir_all(&output).await?;
            println!("Deleted {}", output.display());
        }
    } else {
        println!("Nothing to clean ({} does not exist)", output.display());
    }

    Ok(())
}
