//! gRPC server: the read-only todo projection plus `grpc.health.v1.Health`.

use axum_helpers::ShutdownCoordinator;
use domain_todos::{TodoGrpcService, TodoRepository};
use eyre::{Result, WrapErr};
use rpc::todos::v1::todo_service_server::TodoServiceServer;
use std::net::SocketAddr;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tracing::info;

/// Serve `service` on `addr` until `shutdown` fires.
pub async fn serve<R: TodoRepository + 'static>(
    service: TodoGrpcService<R>,
    addr: SocketAddr,
    shutdown: ShutdownCoordinator,
) -> Result<()> {
    // Health reporter for Kubernetes probes
    let (health_reporter, health_service) = health_reporter();
    health_reporter
        .set_serving::<TodoServiceServer<TodoGrpcService<R>>>()
        .await;
    // Empty service name is what generic probes ask for
    health_reporter
        .set_service_status("", tonic_health::ServingStatus::Serving)
        .await;

    info!("TodoService listening on {} (zstd)", addr);

    Server::builder()
        .add_service(health_service)
        .add_service(
            TodoServiceServer::new(service)
                .accept_compressed(CompressionEncoding::Zstd)
                .send_compressed(CompressionEncoding::Zstd),
        )
        .serve_with_shutdown(addr, async move { shutdown.cancelled().await })
        .await
        .wrap_err("gRPC server failed")?;

    info!("gRPC server stopped");
    Ok(())
}
