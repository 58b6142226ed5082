mod args;

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, error::ErrorKind};
use log::{debug, info};
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

use args::Args;
use followex::{builder::CoreBuilder, config, error::Error, message::Notice};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(args.log_level()) {
        eprintln!("failed to set up logging: {e}");
    }

    match start(args).await {
        Ok(notice) if notice.is_failure() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            match e.downcast_ref::<Error>() {
                Some(err)
                    if matches!(
                        err.root(),
                        Error::InvalidUsername(_) | Error::MissingBearerToken(_)
                    ) =>
                {
                    eprintln!("{}", err.root())
                }
                Some(err) => eprintln!("Error: {err}"),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn start(args: Args) -> Result<Notice> {
    let request = match args.fetch_request() {
        Ok(request) => request,
        Err(msg) => Args::command().error(ErrorKind::ArgumentConflict, msg).exit(),
    };

    let config = config::load(&args.config)?;
    let core = CoreBuilder::new(config)
        .output_dir(&args.output_dir)
        .build()?;
    let report = core.run(request).await?;

    for file in report.files.iter() {
        info!("wrote {}", file.display());
    }
    println!("{}", report.notice);
    Ok(report.notice)
}

fn init_logger(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    LogTracer::init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mockito::{Matcher, Server};
    use tempfile::tempdir;

    use super::*;

    fn parse_args(config: &Path, output_dir: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            "fetch-follower-data".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--output-dir".to_string(),
            output_dir.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_missing_bearer_token_stops_before_requests() {
        let mut server = Server::new_async().await;
        let any_request = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yml");
        std::fs::write(&config_path, format!("api_url: {}\n", server.url())).unwrap();

        let args = parse_args(&config_path, dir.path(), &["jack"]);
        let err = start(args).await.unwrap_err();
        let err = err.downcast_ref::<Error>().unwrap();
        assert!(matches!(err.root(), Error::MissingBearerToken(_)));
        any_request.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_username() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/2/users/by/username/ghost")
            .with_status(200)
            .with_body(r#"{"errors":[{"title":"Not Found Error","detail":"Could not find user with username: [ghost]."}]}"#)
            .create_async()
            .await;
        let followers = server
            .mock("GET", Matcher::Regex("/followers".to_string()))
            .expect(0)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yml");
        std::fs::write(
            &config_path,
            format!("bearer_token: token\napi_url: {}\n", server.url()),
        )
        .unwrap();

        let args = parse_args(&config_path, dir.path(), &["ghost"]);
        let err = start(args).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().unwrap().root().to_string(),
            "Invalid username: ghost"
        );
        followers.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limited_resumable_run_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/2/users/by/username/jack")
            .with_status(200)
            .with_body(r#"{"data":{"id":"12","name":"jack","username":"jack"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", Matcher::Regex("/2/users/12/followers".to_string()))
            .with_status(429)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yml");
        std::fs::write(
            &config_path,
            format!("bearer_token: token\napi_url: {}\n", server.url()),
        )
        .unwrap();

        let args = parse_args(&config_path, dir.path(), &["jack"]);
        assert!(start(args).await.unwrap().is_failure());
        assert!(dir.path().join("jack-tmp.json").is_file());

        let args = parse_args(
            &config_path,
            dir.path(),
            &["--mode", "cursor-suffixed", "jack"],
        );
        assert_eq!(start(args).await.unwrap(), Notice::RateLimitedEmpty);
    }
}
