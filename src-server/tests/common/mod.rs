#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use open_game_list_lib::config::{Config, Profile};
use open_game_list_lib::domain::{timestamp_now, Item};
use open_game_list_lib::repository::Repository;
use open_game_list_lib::{build_router, build_state, AppState};

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn admin_id(&self) -> String {
        self.state.fallback_user.as_ref().expect("fallback user").id.clone()
    }

    /// Insert an item directly, bypassing the API
    pub async fn insert_item(&self, title: &str, minutes_ago: i64, views: i64) -> Item {
        let owner = self
            .state
            .fallback_user
            .as_ref()
            .map(|u| u.id.clone())
            .unwrap_or_else(|| "nobody".to_string());
        let mut item = Item::new(
            title.to_string(),
            owner,
            timestamp_now() - chrono::Duration::minutes(minutes_ago),
        );
        item.view_count = views;
        self.state.items.create(&item).await.expect("insert item")
    }
}

pub async fn spawn_server(profile: Profile) -> TestServer {
    let mut config = Config::development(":memory:");
    config.profile = profile;
    let state = build_state(config).await.expect("build state");
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    TestServer {
        addr,
        state,
        client: reqwest::Client::new(),
    }
}
