// Copyright (c) 2026 rezky_nightky

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use axum::Router;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub const INDEX_DOCUMENT: &str = "index.html";

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("static directory {0} does not exist")]
    MissingDist(PathBuf),
    #[error("{0} not found; build the page first")]
    MissingIndex(PathBuf),
    #[error("invalid listen address {0:?}")]
    Address(String),
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServeSettings {
    pub dist: PathBuf,
    pub host: String,
    pub port: u16,
}

impl ServeSettings {
    pub fn addr(&self) -> Result<SocketAddr, ServeError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ServeError::Address(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

pub fn create_router(dist: &Path) -> Result<Router, ServeError> {
    if !dist.is_dir() {
        return Err(ServeError::MissingDist(dist.to_path_buf()));
    }
    let index = dist.join(INDEX_DOCUMENT);
    if !index.is_file() {
        return Err(ServeError::MissingIndex(index));
    }

    let files = ServeDir::new(dist).fallback(ServeFile::new(index));
    Ok(Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http()))
}

pub async fn serve(settings: &ServeSettings) -> Result<(), ServeError> {
    let addr = settings.addr()?;
    let app = create_router(&settings.dist)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    tracing::info!(
        dist = %settings.dist.display(),
        "Starting server at http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::tempdir;
    use tower::ServiceExt;

    const INDEX_HTML: &str = "<!doctype html><title>rendezvous</title>";

    fn setup_dist() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_DOCUMENT), INDEX_HTML).unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1);").unwrap();
        dir
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_existing_asset() {
        let dir = setup_dist();
        let app = create_router(dir.path()).unwrap();

        let (status, body) = get(app, "/assets/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1);");
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = setup_dist();
        let app = create_router(dir.path()).unwrap();

        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, INDEX_HTML);
    }

    #[tokio::test]
    async fn test_unknown_routes_fall_back_to_index() {
        let dir = setup_dist();

        for uri in ["/countdown", "/photos/2", "/assets/missing.css"] {
            let app = create_router(dir.path()).unwrap();
            let (status, body) = get(app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, INDEX_HTML, "{uri}");
        }
    }

    #[test]
    fn test_missing_dist_is_an_error() {
        let dir = tempdir().unwrap();
        let err = create_router(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ServeError::MissingDist(_)));
    }

    #[test]
    fn test_missing_index_is_an_error() {
        let dir = tempdir().unwrap();
        let err = create_router(dir.path()).unwrap_err();
        assert!(matches!(err, ServeError::MissingIndex(_)));
    }

    #[tokio::test]
    async fn test_bad_host_fails_before_binding() {
        let dir = setup_dist();
        let settings = ServeSettings {
            dist: dir.path().to_path_buf(),
            host: "not an address".into(),
            port: 3000,
        };
        let err = serve(&settings).await.unwrap_err();
        assert!(matches!(err, ServeError::Address(_)));
    }

    #[test]
    fn test_addr_accepts_ipv4_and_ipv6() {
        let mut s = ServeSettings {
            dist: PathBuf::from("dist"),
            host: "0.0.0.0".into(),
            port: 3000,
        };
        assert_eq!(s.addr().unwrap().to_string(), "0.0.0.0:3000");
        s.host = "::1".into();
        assert_eq!(s.addr().unwrap().to_string(), "[::1]:3000");
    }
}
