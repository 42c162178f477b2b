//! In-process stand-in for the managed store: a tiny axum server with an
//! in-memory table map that understands the eq/gt/gte/lt/lte filter subset
//! and the one regions-in-county sub-select the API sends.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering as AtomicOrdering},
    },
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::post,
};
use chrono::DateTime;
use serde_json::Value;

use kejahunt_api::{
    config::{AppConfig, SmtpConfig},
    mailer::Mailer,
    state::AppState,
    store::StoreClient,
};

#[derive(Debug, Clone)]
pub struct ReadLog {
    pub table: String,
    pub pairs: Vec<(String, String)>,
}

#[derive(Default)]
pub struct MockStore {
    pub tables: Mutex<HashMap<String, Vec<Value>>>,
    pub reads: Mutex<Vec<ReadLog>>,
    pub uploads: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

impl MockStore {
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_read(&self, table: &str) -> Option<ReadLog> {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|log| log.table == table)
            .cloned()
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ordered(a: &str, b: &str) -> Ordering {
    if let (Ok(x), Ok(y)) = (a.parse::<f64>(), b.parse::<f64>()) {
        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    } else if let (Ok(x), Ok(y)) = (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b))
    {
        x.cmp(&y)
    } else {
        a.cmp(b)
    }
}

fn matches(
    row: &Value,
    column: &str,
    op_value: &str,
    tables: &HashMap<String, Vec<Value>>,
) -> bool {
    if let Some(rest) = op_value.strip_prefix("in.(select id from regions where county_id=eq.") {
        let county_id: i64 = rest.trim_end_matches(')').parse().unwrap_or(-1);
        let region_ids: Vec<i64> = tables
            .get("regions")
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.get("county_id").and_then(Value::as_i64) == Some(county_id))
                    .filter_map(|r| r.get("id").and_then(Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();
        return row
            .get(column)
            .and_then(Value::as_i64)
            .is_some_and(|v| region_ids.contains(&v));
    }

    let Some((op, value)) = op_value.split_once('.') else {
        return false;
    };
    let value = value.trim_matches('"');
    let field = stringify(row.get(column).unwrap_or(&Value::Null));
    match op {
        "eq" => field == value,
        "gt" => ordered(&field, value) == Ordering::Greater,
        "gte" => ordered(&field, value) != Ordering::Less,
        "lt" => ordered(&field, value) == Ordering::Less,
        "lte" => ordered(&field, value) != Ordering::Greater,
        _ => false,
    }
}

fn parse_pairs(raw: Option<String>) -> Vec<(String, String)> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw.as_deref().unwrap_or(""))
        .unwrap_or_default()
}

fn select_rows(store: &MockStore, table: &str, pairs: &[(String, String)]) -> Vec<Value> {
    let tables = store.tables.lock().unwrap();
    let empty = Vec::new();
    let rows = tables.get(table).unwrap_or(&empty);

    let mut limit: Option<usize> = None;
    let mut offset: usize = 0;
    let mut matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            pairs.iter().all(|(column, op_value)| match column.as_str() {
                "select" => true,
                "limit" | "offset" => true,
                _ => matches(row, column, op_value, &tables),
            })
        })
        .cloned()
        .collect();

    for (column, value) in pairs {
        match column.as_str() {
            "limit" => limit = value.parse().ok(),
            "offset" => offset = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    if offset > 0 {
        matched = matched.into_iter().skip(offset).collect();
    }
    if let Some(limit) = limit {
        matched.truncate(limit);
    }
    matched
}

async fn table_get(
    State(store): State<Arc<MockStore>>,
    Path(table): Path<String>,
    RawQuery(raw): RawQuery,
) -> Json<Vec<Value>> {
    let pairs = parse_pairs(raw);
    store.reads.lock().unwrap().push(ReadLog {
        table: table.clone(),
        pairs: pairs.clone(),
    });
    Json(select_rows(&store, &table, &pairs))
}

async fn table_post(
    State(store): State<Arc<MockStore>>,
    Path(table): Path<String>,
    Json(mut row): Json<Value>,
) -> (StatusCode, Json<Vec<Value>>) {
    if row.get("id").is_none() {
        let id = store.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        row["id"] = Value::from(id);
    }
    store
        .tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .push(row.clone());
    (StatusCode::CREATED, Json(vec![row]))
}

async fn table_patch(
    State(store): State<Arc<MockStore>>,
    Path(table): Path<String>,
    RawQuery(raw): RawQuery,
    Json(patch): Json<Value>,
) -> StatusCode {
    let pairs = parse_pairs(raw);
    let mut tables = store.tables.lock().unwrap();
    let snapshot = tables.clone();
    if let Some(rows) = tables.get_mut(&table) {
        for row in rows.iter_mut() {
            let hit = pairs
                .iter()
                .all(|(column, op_value)| matches(row, column, op_value, &snapshot));
            if hit {
                if let (Some(obj), Some(patch_obj)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in patch_obj {
                        obj.insert(k.clone(), v.clone());
                    }
                }
            }
        }
    }
    StatusCode::NO_CONTENT
}

async fn table_delete(
    State(store): State<Arc<MockStore>>,
    Path(table): Path<String>,
    RawQuery(raw): RawQuery,
) -> StatusCode {
    let pairs = parse_pairs(raw);
    let mut tables = store.tables.lock().unwrap();
    let snapshot = tables.clone();
    if let Some(rows) = tables.get_mut(&table) {
        rows.retain(|row| {
            !pairs
                .iter()
                .all(|(column, op_value)| matches(row, column, op_value, &snapshot))
        });
    }
    StatusCode::NO_CONTENT
}

async fn object_post(
    State(store): State<Arc<MockStore>>,
    Path((bucket, filename)): Path<(String, String)>,
    _body: Bytes,
) -> Json<Value> {
    store
        .uploads
        .lock()
        .unwrap()
        .push(format!("{bucket}/{filename}"));
    Json(serde_json::json!({ "Key": format!("{bucket}/{filename}") }))
}

/// Bind the mock store on an ephemeral port and serve it for the test's
/// lifetime.
pub async fn spawn_mock_store() -> (String, Arc<MockStore>) {
    let store = Arc::new(MockStore::default());
    let app = Router::new()
        .route(
            "/rest/v1/{table}",
            axum::routing::get(table_get)
                .post(table_post)
                .patch(table_patch)
                .delete(table_delete),
        )
        .route("/storage/v1/object/{bucket}/{filename}", post(object_post))
        .with_state(Arc::clone(&store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock store");
    let addr = listener.local_addr().expect("mock store addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock store");
    });

    (format!("http://{addr}"), store)
}

pub fn test_state(base_url: &str) -> AppState {
    let smtp = SmtpConfig {
        host: "127.0.0.1".to_string(),
        // Nothing listens here; reminder sends are expected to fail in tests.
        port: 1,
        user: "test".to_string(),
        password: "test".to_string(),
        from: "KejaHunt <noreply@kejahunt.example>".to_string(),
    };
    let config = AppConfig {
        supabase_url: base_url.to_string(),
        supabase_key: "test-key".to_string(),
        supabase_bucket: "listing-photos".to_string(),
        jwt_secret: "test-secret".to_string(),
        smtp: smtp.clone(),
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let store = StoreClient::new(base_url, "test-key").expect("store client");
    let mailer = Mailer::new(&smtp).expect("mailer");
    AppState {
        config,
        store,
        mailer,
    }
}
