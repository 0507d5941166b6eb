use crate::database::DatabaseConnectionPool;
use diesel::{ConnectionError, ConnectionResult};
use diesel_async::pooled_connection::deadpool::{BuildError, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::ManagerConfig;
use diesel_async::AsyncPgConnection;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

pub fn create_connection_pool(
    url: &str,
) -> Result<DatabaseConnectionPool, BuildError> {
    let mut config = ManagerConfig::default();
    config.custom_setup = Box::new(establish_connection);
    let connection_manager =
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            url, config,
        );
    Pool::builder(connection_manager).build()
}

/// Opens a rustls-backed connection, honouring `sslmode` in `config`.
pub fn establish_connection(
    config: &str,
) -> BoxFuture<ConnectionResult<AsyncPgConnection>> {
    let future = async {
        let rustls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_certificates()?)
            .with_no_client_auth();
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(rustls_config);
        let (client, conn) = tokio_postgres::connect(config, tls)
            .await
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::error!(error.cause_chain = ?e, "Database connection failed.");
            }
        });
        AsyncPgConnection::try_from(client).await
    };
    future.boxed()
}

fn root_certificates() -> ConnectionResult<rustls::RootCertStore> {
    let mut roots = rustls::RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs().map_err(|e| {
        ConnectionError::BadConnection(format!(
            "Certificates not loadable: {e}"
        ))
    })?;
    for cert in certs {
        if let Err(e) = roots.add(cert) {
            tracing::warn!(error = %e, "Skipping unparsable platform certificate.");
        }
    }
    Ok(roots)
}
