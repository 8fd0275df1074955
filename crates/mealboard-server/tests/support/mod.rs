// SPDX-License-Identifier: Apache-2.0

use mealboard_model::{DepartmentId, DietTypeId, TenantId};
use mealboard_server::{build_router, AppState};
use mealboard_store::Store;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub fn seeded_store() -> Arc<Store> {
    let store = Store::open_in_memory().expect("open store");
    let tenant = TenantId::new(1).expect("tenant");
    for (id, name) in [("west", "West Wing"), ("east", "East Wing")] {
        store
            .upsert_department(tenant, &DepartmentId::parse(id).expect("id"), name)
            .expect("seed department");
    }
    for (id, name) in [("gluten", "Gluten-free"), ("lactose", "Lactose-free")] {
        store
            .upsert_diet_type(tenant, &DietTypeId::parse(id).expect("id"), name)
            .expect("seed diet type");
    }
    Arc::new(store)
}

pub async fn serve(store: Arc<Store>) -> std::net::SocketAddr {
    let app = build_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

pub async fn send_raw(
    addr: std::net::SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
) -> (u16, String, String) {
    send_raw_with_method(addr, "GET", path, headers, None).await
}

pub async fn send_raw_with_method(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(payload) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    if let Some(payload) = body {
        req.push_str(payload);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

pub fn header_value(head: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}: ");
    head.lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(str::trim)
        .map(str::to_string)
}
