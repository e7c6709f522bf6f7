use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAlertPublisher, InMemoryHealthStore, InMemoryNetworkStore};
use crate::routes::with_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kinship::config::{AppConfig, HealthConfig, NetworkConfig};
use kinship::error::AppError;
use kinship::health::{CircleMembership, HealthScoringService, MembershipImporter, UserId};
use kinship::network::{
    ConnectionEdge, ContactImporter, EdgeImporter, NetworkContact, NetworkService,
};
use kinship::telemetry;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

/// Data the in-memory stores start with.
#[derive(Debug, Default)]
pub(crate) struct SeedData {
    pub(crate) memberships: Vec<(UserId, CircleMembership)>,
    pub(crate) contacts: Vec<(UserId, NetworkContact)>,
    pub(crate) edges: Vec<ConnectionEdge>,
}

impl SeedData {
    pub(crate) fn load(
        circles: Option<PathBuf>,
        contacts: Option<PathBuf>,
        edges: Option<PathBuf>,
    ) -> Result<Self, AppError> {
        let mut seed = SeedData::default();
        if let Some(path) = circles {
            seed.memberships = MembershipImporter::from_path(&path)?;
            info!(
                rows = seed.memberships.len(),
                path = %path.display(),
                "circle memberships loaded"
            );
        }
        if let Some(path) = contacts {
            seed.contacts = ContactImporter::from_path(&path)?;
            info!(rows = seed.contacts.len(), path = %path.display(), "contacts loaded");
        }
        if let Some(path) = edges {
            seed.edges = EdgeImporter::from_path(&path)?;
            info!(rows = seed.edges.len(), path = %path.display(), "connection edges loaded");
        }
        Ok(seed)
    }
}

pub(crate) fn build_router(
    seed: SeedData,
    health: HealthConfig,
    network: NetworkConfig,
) -> axum::Router {
    let health_service = Arc::new(HealthScoringService::new(
        Arc::new(InMemoryHealthStore::with_memberships(seed.memberships)),
        Arc::new(InMemoryAlertPublisher::default()),
        health,
    ));
    let network_service = Arc::new(NetworkService::new(
        Arc::new(InMemoryNetworkStore::new(seed.edges, seed.contacts)),
        network,
    ));
    with_routes(health_service, network_service)
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let seed = SeedData::load(args.circles.take(), args.contacts.take(), args.edges.take())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = build_router(seed, config.health, config.network)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kinship service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn seed() -> SeedData {
        let circles = "user_id,contact_id,tier\nme,margaret,1\nme,grace,2\n";
        let contacts = "user_id,node_id,name,company\nme,margaret,Margaret Hamilton,MIT\n";
        let edges = "source_id,target_id\nme,grace\ngrace,margaret\n";
        SeedData {
            memberships: MembershipImporter::from_reader(circles.as_bytes()).expect("circles"),
            contacts: ContactImporter::from_reader(contacts.as_bytes()).expect("contacts"),
            edges: EdgeImporter::from_reader(edges.as_bytes()).expect("edges"),
        }
    }

    async fn send(router: &axum::Router, request: Request<Body>) -> serde_json::Value {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    fn post(uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .expect("request builds")
    }

    #[tokio::test]
    async fn seeded_router_refreshes_circles_and_finds_introductions() {
        let router = build_router(seed(), HealthConfig::default(), NetworkConfig::default());

        let refreshed = send(
            &router,
            post("/api/v1/users/me/health/refresh", Body::empty()),
        )
        .await;
        assert_eq!(refreshed["processed"], 2);
        assert_eq!(refreshed["breakdown"]["healthy"], 2);

        let lookup = send(
            &router,
            post(
                "/api/v1/users/me/network/introductions",
                Body::from(json!({ "name": "hamilton" }).to_string()),
            ),
        )
        .await;
        assert_eq!(lookup["outcome"], "connected");
        assert_eq!(lookup["path"], json!(["me", "grace", "margaret"]));
        assert_eq!(lookup["contact"]["company"], "MIT");
    }

    #[tokio::test]
    async fn contacts_are_scoped_to_their_owner() {
        let router = build_router(seed(), HealthConfig::default(), NetworkConfig::default());

        let lookup = send(
            &router,
            post(
                "/api/v1/users/someone-else/network/introductions",
                Body::from(json!({ "name": "hamilton" }).to_string()),
            ),
        )
        .await;
        assert_eq!(lookup["outcome"], "not_in_network");
    }

    #[test]
    fn missing_seed_files_surface_as_import_errors() {
        let result = SeedData::load(Some(PathBuf::from("/nonexistent/circles.csv")), None, None);
        assert!(matches!(result, Err(AppError::Import(_))));
    }
}
