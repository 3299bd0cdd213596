use std::{
    env,
    net::{Ipv6Addr, SocketAddr},
    sync::Arc,
};

use axum::{routing::get, Router as AxumRouter};
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod context;
mod docs;
mod errors;
mod health;
mod matchmaking;
mod questions;
mod rooms;
mod schemas;
mod serialized;

pub mod logging;

pub use context::{ServerContext, ServerPlatform};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 9600;

pub type Router = AxumRouter<ServerContext>;

/// Starts the codeduel server
pub async fn run_server(platform: ServerPlatform) {
    let port = env::var("CODEDUEL_SERVER_PORT")
        .map(|x| x.parse::<u16>().expect("Port must be a number"))
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let context = ServerContext {
        platform: Arc::new(platform),
    };

    let api_router = Router::new()
        .nest("/matchmaking", matchmaking::router())
        .nest("/questions", questions::router())
        .nest("/rooms", rooms::router())
        .route("/health", get(health::health))
        .route("/docs.json", get(docs::docs));

    let root_router = Router::new()
        .nest("/api", api_router)
        .layer(cors)
        .with_state(context);

    let listener = TcpListener::bind(&addr).await.expect("listens on address");

    info!("Listening on port {}", port);

    axum::serve(listener, root_router.into_make_service())
        .await
        .expect("server runs");
}
