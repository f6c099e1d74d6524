//! 测试用的内存版 Roster 服务
//!
//! 只实现成员与活动的增删改查，其余集合接口返回空列表。

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use reqwest::Client;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

use crate::services::request::RequestClient;

#[derive(Default)]
struct RosterData {
    members: Vec<Value>,
    events: Vec<Value>,
    hits: Vec<String>,
    /// 下一次请求直接返回的错误
    fail_next: Option<(u16, String)>,
}

#[derive(Clone)]
pub struct MockRoster {
    addr: SocketAddr,
    data: Arc<Mutex<RosterData>>,
}

impl MockRoster {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let data = Arc::new(Mutex::new(RosterData::default()));
        let server_data = Arc::clone(&data);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let data = Arc::clone(&server_data);
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let data = Arc::clone(&data);
                        async move {
                            let method = req.method().to_string();
                            let path = req.uri().path().to_string();
                            let bytes = req
                                .into_body()
                                .collect()
                                .await
                                .map(|b| b.to_bytes())
                                .unwrap_or_default();
                            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
                            let (status, reply) =
                                handle(&mut data.lock().unwrap(), &method, &path, body);
                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(status)
                                    .header("content-type", "application/json")
                                    .body(Full::new(Bytes::from(reply.to_string())))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, data }
    }

    pub fn client(&self) -> RequestClient {
        let http = Client::builder().no_proxy().build().unwrap();
        RequestClient::new(http, Url::parse(&format!("http://{}", self.addr)).unwrap())
    }

    pub fn seed_members(&self, members: Vec<Value>) {
        self.data.lock().unwrap().members = members;
    }

    pub fn seed_events(&self, events: Vec<Value>) {
        self.data.lock().unwrap().events = events;
    }

    pub fn members(&self) -> Vec<Value> {
        self.data.lock().unwrap().members.clone()
    }

    /// 已收到的请求，形如 `GET /api/brothers`
    pub fn hits(&self) -> Vec<String> {
        self.data.lock().unwrap().hits.clone()
    }

    pub fn fail_next(&self, status: u16, message: &str) {
        self.data.lock().unwrap().fail_next = Some((status, message.to_string()));
    }
}

fn success(data: Value) -> (u16, Value) {
    (200, json!({"status": "success", "data": data}))
}

fn fail(status: u16, message: &str) -> (u16, Value) {
    (status, json!({"status": "fail", "message": message}))
}

fn handle(data: &mut RosterData, method: &str, path: &str, body: Value) -> (u16, Value) {
    data.hits.push(format!("{method} {path}"));
    if let Some((status, message)) = data.fail_next.take() {
        return fail(status, &message);
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        ("GET", ["api", "brothers"]) => success(Value::Array(data.members.clone())),
        ("POST", ["api", "brothers"]) => {
            let next_id = data
                .members
                .iter()
                .filter_map(|m| m["brotherID"].as_i64())
                .max()
                .unwrap_or(0)
                + 1;
            let mut member = body;
            member["brotherID"] = json!(next_id);
            data.members.push(member.clone());
            (201, json!({"status": "success", "data": member}))
        }
        ("PATCH", ["api", "brothers", id]) => {
            let Some(member) = find_mut(&mut data.members, "brotherID", id) else {
                return fail(404, "Brother not found");
            };
            merge(member, body);
            success(member.clone())
        }
        ("DELETE", ["api", "brothers", id]) => remove(&mut data.members, "brotherID", id, "Brother not found"),
        ("GET", ["api", "events"]) => success(Value::Array(data.events.clone())),
        ("PATCH", ["api", "events", id]) => {
            let Some(event) = find_mut(&mut data.events, "eventID", id) else {
                return fail(404, "Event not found");
            };
            merge(event, body);
            success(Value::Array(vec![event.clone()]))
        }
        ("DELETE", ["api", "events", id]) => remove(&mut data.events, "eventID", id, "Event not found"),
        ("GET", _) => (200, json!({"status": "success", "data": null})),
        _ => fail(405, "Method not allowed"),
    }
}

fn find_mut<'a>(rows: &'a mut [Value], field: &str, id: &str) -> Option<&'a mut Value> {
    let id: i64 = id.parse().ok()?;
    rows.iter_mut().find(|row| row[field].as_i64() == Some(id))
}

fn merge(target: &mut Value, patch: Value) {
    if let (Some(target), Value::Object(patch)) = (target.as_object_mut(), patch) {
        target.extend(patch);
    }
}

fn remove(rows: &mut Vec<Value>, field: &str, id: &str, missing: &str) -> (u16, Value) {
    let Ok(id) = id.parse::<i64>() else {
        return fail(400, "Invalid id");
    };
    match rows.iter().position(|row| row[field].as_i64() == Some(id)) {
        Some(index) => success(rows.remove(index)),
        None => fail(404, missing),
    }
}
