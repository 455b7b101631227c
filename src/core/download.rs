use crate::error::{AcgetError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::ZipArchive;

pub struct Downloader {
    client: reqwest::blocking::Client,
}

/// Read-side failures during the streamed copy come from the transport;
/// reqwest surfaces them as an `io::Error` wrapping its own error type.
/// Unwrap those back into `Network`, leaving genuine local IO as `Io`.
fn stream_error(e: std::io::Error) -> AcgetError {
    match e.downcast::<reqwest::Error>() {
        Ok(source) => AcgetError::Network(source),
        Err(other) => AcgetError::Io(other),
    }
}

impl Downloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("acget/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Stream the artifact to `destination`, reporting cumulative bytes
    /// against `Content-Length`. A missing length degrades to a spinner
    /// rather than failing; the bytes still arrive either way.
    pub fn download_file(&self, url: &str, api_token: &str, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let response = self
            .client
            .get(url)
            .header("X-API-Token", api_token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcgetError::Http {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let bar = match response.content_length() {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "Downloading {bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => {
                log::warn!("Response has no Content-Length header, progress is indeterminate");
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("Downloading {spinner} {bytes}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };

        let mut source = bar.wrap_read(response);
        let mut output = File::create(destination)?;
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = source.read(&mut buf).map_err(stream_error)?;
            if n == 0 {
                break;
            }
            output.write_all(&buf[..n])?;
        }
        bar.finish();

        Ok(())
    }

    /// Expand a zip artifact into `destination`, one progress tick per
    /// entry. Entries whose names escape the destination are skipped.
    pub fn extract_zip(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        std::fs::create_dir_all(destination)?;

        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| AcgetError::Extraction {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

        let bar = ProgressBar::new(archive.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("Unzipping {bar:40.cyan/blue} {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| AcgetError::Extraction {
                path: archive_path.to_path_buf(),
                source: e,
            })?;

            let outpath = match entry.enclosed_name() {
                Some(path) => destination.join(path),
                None => {
                    log::warn!("Skipping archive entry with unsafe name: {}", entry.name());
                    bar.inc(1);
                    continue;
                }
            };

            if entry.name().ends_with('/') {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(p) = outpath.parent() {
                    if !p.exists() {
                        std::fs::create_dir_all(p)?;
                    }
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut entry, &mut outfile)?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }

            bar.inc(1);
        }

        bar.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::{SocketAddr, TcpListener};
    use zip::write::SimpleFileOptions;

    fn write_test_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    /// Serve one canned HTTP response on a local port and return the
    /// address to request it from.
    fn serve_once(response: Vec<u8>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            stream.write_all(&response).unwrap();
        });
        addr
    }

    fn ok_response(payload: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            payload.len()
        )
        .into_bytes();
        response.extend_from_slice(payload);
        response
    }

    #[test]
    fn test_download_file_writes_exact_bytes() {
        let payload = b"installer payload \x01\x02\x03 with binary bytes".to_vec();
        let addr = serve_once(ok_response(&payload));

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("1.2.3.zip");
        Downloader::new()
            .unwrap()
            .download_file(&format!("http://{addr}/build"), "token", &dest)
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), payload);
    }

    #[test]
    fn test_download_file_overwrites_existing_artifact() {
        let payload = b"new build".to_vec();
        let addr = serve_once(ok_response(&payload));

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("1.2.3.zip");
        std::fs::write(&dest, "stale bytes from a previous run").unwrap();

        Downloader::new()
            .unwrap()
            .download_file(&format!("http://{addr}/build"), "token", &dest)
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), payload);
    }

    #[test]
    fn test_download_file_http_error_carries_status_and_body() {
        let body = "token expired";
        let response = format!(
            "HTTP/1.1 403 Forbidden\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let addr = serve_once(response.into_bytes());

        let dir = tempfile::tempdir().unwrap();
        let result = Downloader::new().unwrap().download_file(
            &format!("http://{addr}/build"),
            "token",
            &dir.path().join("1.2.3.zip"),
        );

        match result {
            Err(AcgetError::Http { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "token expired");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_download_file_truncated_stream_is_network_error() {
        // Announce 1000 bytes, deliver 9, then close the connection.
        let response = b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\ntruncated".to_vec();
        let addr = serve_once(response);

        let dir = tempfile::tempdir().unwrap();
        let result = Downloader::new().unwrap().download_file(
            &format!("http://{addr}/build"),
            "token",
            &dir.path().join("1.2.3.zip"),
        );

        assert!(matches!(result, Err(AcgetError::Network(_))));
    }

    #[test]
    fn test_extract_zip_expands_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("build.zip");
        write_test_zip(
            &archive,
            &[
                ("readme.txt", "hello"),
                ("nested/setup.exe", "binary bits"),
            ],
        );

        let dest = dir.path().join("out");
        Downloader::new().unwrap().extract_zip(&archive, &dest).unwrap();

        assert_eq!(std::fs::read_to_string(dest.join("readme.txt")).unwrap(), "hello");
        assert_eq!(
            std::fs::read_to_string(dest.join("nested/setup.exe")).unwrap(),
            "binary bits"
        );
    }

    #[test]
    fn test_extract_zip_skips_traversal_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_test_zip(&archive, &[("../escape.txt", "nope"), ("safe.txt", "ok")]);

        let dest = dir.path().join("out");
        Downloader::new().unwrap().extract_zip(&archive, &dest).unwrap();

        assert!(dest.join("safe.txt").exists());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_extract_zip_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not-a-zip.zip");
        std::fs::write(&bogus, "plain text").unwrap();

        let result = Downloader::new().unwrap().extract_zip(&bogus, &dir.path().join("out"));
        assert!(matches!(result, Err(AcgetError::Extraction { .. })));
    }
}
