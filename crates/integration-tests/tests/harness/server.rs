//! Concierge instance running on an ephemeral port for the duration of
//! a test

use std::net::SocketAddr;

use concierge_config::Config;
use concierge_server::Server;
use tokio_util::sync::CancellationToken;

pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start the full server stack on 127.0.0.1 with a port picked by
    /// the OS, overriding whatever address the config carries
    pub async fn start(mut config: Config) -> anyhow::Result<Self> {
        config.server.listen_address = Some("127.0.0.1:0".parse()?);

        let bound = Server::new(config).await.bind().await?;
        let addr = bound.local_addr();

        let shutdown = CancellationToken::new();
        let serve_shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = bound.serve(serve_shutdown).await {
                eprintln!("test server exited with error: {e}");
            }
        });

        Ok(Self {
            addr,
            shutdown,
            client: reqwest::Client::new(),
        })
    }

    /// Full URL for a path on the running server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
