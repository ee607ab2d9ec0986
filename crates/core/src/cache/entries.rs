//! Namespace and entry operations for the SQLite store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_rusqlite::{params, rusqlite};

use super::CacheStore;
use super::connection::SqliteStore;
use super::hash::compute_cache_key;
use crate::{Error, Method, Response, ResponseKind};

/// Row shape of a stored entry before decoding.
type EntryRow = (u16, String, String, String, Vec<u8>);

fn decode(row: EntryRow) -> Result<Response, Error> {
    let (status, status_text, kind, headers_json, body) = row;
    let headers: BTreeMap<String, String> = serde_json::from_str(&headers_json)?;
    Ok(Response { status, status_text, headers, body: Bytes::from(body), kind: kind.parse::<ResponseKind>()? })
}

fn insert_namespace(conn: &rusqlite::Connection, namespace: &str, now: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT OR IGNORE INTO namespaces (name, created_at) VALUES (?1, ?2)",
        params![namespace, now],
    )?;
    Ok(())
}

fn upsert_entry(
    conn: &rusqlite::Connection, namespace: &str, key: &str, response: &Response, now: &str,
) -> Result<(), Error> {
    let method = Method::Get.as_str();
    let headers_json = serde_json::to_string(&response.headers)?;
    conn.execute(
        "INSERT INTO entries (
            namespace, key_hash, method, url, status, status_text, kind, headers_json, body, stored_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(namespace, key_hash) DO UPDATE SET
            status = excluded.status,
            status_text = excluded.status_text,
            kind = excluded.kind,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![
            namespace,
            compute_cache_key(method, key),
            method,
            key,
            response.status,
            &response.status_text,
            response.kind.as_str(),
            headers_json,
            response.body.as_ref(),
            now,
        ],
    )?;
    Ok(())
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn open(&self, namespace: &str) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> { insert_namespace(conn, &namespace, &now) })
            .await
            .map_err(Error::from)
    }

    async fn namespaces(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM namespaces ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<bool, Error> {
        let namespace = namespace.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM namespaces WHERE name = ?1", params![namespace])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Response>, Error> {
        let namespace = namespace.to_string();
        let key_hash = compute_cache_key(Method::Get.as_str(), key);
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let result = conn.query_row(
                    "SELECT status, status_text, kind, headers_json, body
                     FROM entries WHERE namespace = ?1 AND key_hash = ?2",
                    params![namespace, key_hash],
                    |row| -> rusqlite::Result<EntryRow> {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                    },
                );

                match result {
                    Ok(row) => decode(row).map(Some),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, namespace: &str, key: &str, response: Response) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                insert_namespace(conn, &namespace, &now)?;
                upsert_entry(conn, &namespace, &key, &response, &now)
            })
            .await
            .map_err(Error::from)
    }

    async fn put_all(&self, namespace: &str, entries: Vec<(String, Response)>) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                insert_namespace(&tx, &namespace, &now)?;
                for (key, response) in &entries {
                    upsert_entry(&tx, &namespace, key, response, &now)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self, namespace: &str) -> Result<Vec<String>, Error> {
        let namespace = namespace.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE namespace = ?1 ORDER BY url")?;
                let keys = stmt
                    .query_map(params![namespace], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }
}
