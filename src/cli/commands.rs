//! Command implementations for the CLI
//!
//! Each handler assembles a [`Subsystem`] from the resolved configuration,
//! runs one operation against it and prints the outcome.

use std::path::PathBuf;

use futures::future::join_all;
use tracing::{debug, info};

use crate::app::{Image, Subsystem, TopicRecord};
use crate::cli::args::{ConfigAction, ConfigArgs, FetchArgs, ImageArgs, ListArgs, ShowArgs};
use crate::cli::progress::ImageProgress;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Build the subsystem described by a loaded configuration
fn assemble(config: &AppConfig) -> Result<Subsystem> {
    config.validate()?;
    Subsystem::assemble(config.to_runtime_config()?)
}

/// Handle the fetch command
pub async fn handle_fetch(args: FetchArgs, config: AppConfig) -> Result<()> {
    let subsystem = assemble(&config)?;
    let service = subsystem.fetch();

    let payload = if args.reload {
        service.reload().await?
    } else {
        service.fetch().await?
    };

    println!(
        "✅ Fetched {} bytes from {}",
        payload.len(),
        service.endpoint()
    );
    Ok(())
}

/// Handle the list command
pub async fn handle_list(args: ListArgs, config: AppConfig, quiet: bool) -> Result<()> {
    let subsystem = assemble(&config)?;
    let mut topics = subsystem.load_topics(args.reload).await?;
    if let Some(limit) = args.limit {
        topics.truncate(limit);
    }

    if topics.is_empty() {
        println!("No topics found");
        return Ok(());
    }

    if !args.images {
        for (i, topic) in topics.iter().enumerate() {
            println!("{}", format_row(i, topic));
        }
        return Ok(());
    }

    info!("Fetching {} images", topics.len());
    let progress = ImageProgress::new(topics.len(), quiet)?;
    let requests = topics.iter().map(|topic| {
        let images = subsystem.images();
        let progress = &progress;
        async move {
            let image = images.fetch_image(topic.image_path()).await;
            progress.record(&image);
            image
        }
    });
    let images = join_all(requests).await;
    progress.finish();

    for (i, (topic, image)) in topics.iter().zip(&images).enumerate() {
        println!("{}  [{}]", format_row(i, topic), image);
    }

    let stats = subsystem.stats().await;
    let placeholders = images.iter().filter(|image| image.is_placeholder()).count();
    println!();
    println!("📊 Image Summary:");
    println!("  Images: {}", images.len() - placeholders);
    println!("  Placeholders: {}", placeholders);
    println!("  Queue: {}", stats.queue.summary());
    debug!("Cache: {:?}", stats.cache);

    Ok(())
}

/// Handle the show command
pub async fn handle_show(args: ShowArgs, config: AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let subsystem = assemble(&config)?;
    let topics = subsystem.load_topics(args.reload).await?;
    let topic = topics.get(args.index - 1).ok_or_else(|| {
        AppError::generic(format!(
            "Topic {} does not exist (list has {} entries)",
            args.index,
            topics.len()
        ))
    })?;

    let (name, description) = topic.name_and_description();
    let image = subsystem.images().fetch_image(topic.image_path()).await;

    println!("Name:        {}", name.as_deref().unwrap_or("-"));
    println!("Description: {}", description.as_deref().unwrap_or("-"));
    if let Some(url) = &topic.first_url {
        println!("Link:        {}", url);
    }
    println!(
        "Image:       {} ({})",
        describe_image(&image),
        subsystem.images().locator_for(topic.image_path())
    );

    Ok(())
}

/// Handle the image command
pub async fn handle_image(args: ImageArgs, config: AppConfig) -> Result<()> {
    let subsystem = assemble(&config)?;
    let images = subsystem.images();

    let image = images.fetch_image(&args.path).await;
    println!("{}: {}", images.locator_for(&args.path), describe_image(&image));

    Ok(())
}

/// Handle configuration management
pub async fn handle_config(args: ConfigArgs, config_file: Option<PathBuf>) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path.or(config_file) {
                Some(path) => path,
                None => AppConfig::get_default_config_path()?,
            };
            AppConfig::write_default_config(&path, force).await?;
            println!("📁 Created configuration file: {}", path.display());
        }
        ConfigAction::Show => {
            let config = AppConfig::load(config_file).await?;
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

fn format_row(index: usize, topic: &TopicRecord) -> String {
    match topic.name_and_description() {
        (Some(name), Some(description)) => format!("{:>3}. {} - {}", index + 1, name, description),
        (Some(name), None) => format!("{:>3}. {}", index + 1, name),
        _ => format!("{:>3}. (untitled)", index + 1),
    }
}

fn describe_image(image: &Image) -> String {
    match image {
        Image::Decoded(_) => format!("{} ({} bytes decoded)", image, image.byte_size()),
        Image::Placeholder(kind) => format!("⚠️  {}", kind),
    }
}
