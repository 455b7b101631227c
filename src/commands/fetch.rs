use crate::core::appcenter::{self, AppCenterClient};
use crate::core::download::Downloader;
use crate::core::installer;
use crate::core::settings::Settings;
use crate::error::Result;
use crate::utils::{prompt, timestamp};
use std::path::Path;

/// Run the whole pipeline: locate the newest release, download it,
/// unzip it, and optionally start the installer.
pub fn fetch(settings_path: &Path, install: bool) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let client = AppCenterClient::new(settings.api_token.clone())?;
    let downloader = Downloader::new()?;

    println!(
        "Getting releases for {}/{}...",
        settings.owner_name, settings.app_name
    );
    let releases = client.get_releases(
        &settings.owner_name,
        &settings.app_name,
        &settings.distribution_group_name,
    )?;

    let newest = appcenter::latest_release(&releases)?;
    log::debug!(
        "Newest release id {} in group {} ({})",
        newest.id,
        settings.distribution_group_name,
        settings.distribution_group_id
    );

    let release = client.get_release(
        &settings.owner_name,
        &settings.app_name,
        &settings.distribution_group_name,
        newest.id,
    )?;
    let output_file = settings.artifact_path(&release.version, &release.file_extension);

    let uploaded_at = timestamp::format_uploaded_at(&newest.uploaded_at);
    if !prompt::confirm(&format!(
        "Do you want to download version {} uploaded at {uploaded_at}?",
        release.version
    ))? {
        println!("Answer was not 'Y' or 'Yes'. Aborting.");
        return Ok(());
    }

    if output_file.exists()
        && !prompt::confirm(&format!(
            "File {} already exists. Do you want to overwrite it?",
            output_file.display()
        ))?
    {
        println!("Answer was not 'Y' or 'Yes'. Aborting.");
        return Ok(());
    }

    downloader.download_file(&release.download_url, &settings.api_token, &output_file)?;
    println!("Downloaded to {}", output_file.display());

    let unzip_dir = settings.unzip_dir(&release.version);
    let extracted = if release.file_extension == "zip" {
        println!("Unzipping the downloaded file...");
        downloader.extract_zip(&output_file, &unzip_dir)?;
        println!("Done.");
        true
    } else {
        false
    };

    if !install {
        return Ok(());
    }

    if !extracted {
        println!(
            "Artifact {} is not a zip archive, skipping the installer search.",
            output_file.display()
        );
        return Ok(());
    }

    match installer::find_installer(&unzip_dir, &settings.installer_filetype)? {
        Some(installer_path) => {
            installer::run_installer(&installer_path, settings.installer_args.as_deref())?;
            println!("Done.");
        }
        None => println!("No installer file found in the latest release."),
    }

    Ok(())
}
