use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, error, info};

use crate::model::AirportsResponse;

/// One page fetch. `seq` ties the reply back to the request; the app only
/// honours the newest sequence, so superseded fetches are never cancelled,
/// their results are simply ignored.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: String,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug)]
pub enum FetchMessage {
    Results { seq: u64, data: AirportsResponse },
    Error { seq: u64, message: String },
}

pub fn spawn_fetcher(
    base_url: String,
    api_key: String,
    timeout: Duration,
    rx: Receiver<FetchRequest>,
    tx: Sender<FetchMessage>,
) {
    thread::spawn(move || {
        info!("fetcher started");
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(err) => {
                error!("client error: {err}");
                let _ = tx.send(FetchMessage::Error {
                    seq: 0,
                    message: format!("Client error: {err}"),
                });
                return;
            }
        };

        let base = base_url.trim_end_matches('/').to_string();

        while let Ok(req) = rx.recv() {
            debug!(
                "fetch seq={} offset={} limit={} query={:?}",
                req.seq, req.offset, req.limit, req.query
            );
            let params = build_query(&api_key, &req);
            match client.get(&base).query(&params).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        let _ = tx.send(FetchMessage::Error {
                            seq: req.seq,
                            message: format!("HTTP {status}"),
                        });
                        continue;
                    }
                    match resp.json::<AirportsResponse>() {
                        Ok(data) => {
                            let _ = tx.send(FetchMessage::Results {
                                seq: req.seq,
                                data,
                            });
                        }
                        Err(err) => {
                            let _ = tx.send(FetchMessage::Error {
                                seq: req.seq,
                                message: format!("Parse error: {err}"),
                            });
                        }
                    }
                }
                Err(err) => {
                    debug!("fetch request error: {err}");
                    let _ = tx.send(FetchMessage::Error {
                        seq: req.seq,
                        message: err.to_string(),
                    });
                }
            }
        }
    });
}

/// Query string for the upstream provider. `search` is only sent when the
/// query is non-empty; the provider rejects an empty search term.
fn build_query(api_key: &str, req: &FetchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("access_key", api_key.to_string()),
        ("limit", req.limit.to_string()),
        ("offset", req.offset.to_string()),
    ];
    let query = req.query.trim();
    if !query.is_empty() {
        params.push(("search", query.to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::{build_query, FetchRequest};

    #[test]
    fn query_omits_empty_search() {
        let req = FetchRequest {
            seq: 1,
            query: "   ".to_string(),
            limit: 25,
            offset: 50,
        };
        let params = build_query("secret", &req);
        assert_eq!(
            params,
            vec![
                ("access_key", "secret".to_string()),
                ("limit", "25".to_string()),
                ("offset", "50".to_string()),
            ]
        );
    }

    #[test]
    fn query_includes_trimmed_search() {
        let req = FetchRequest {
            seq: 2,
            query: " bogota ".to_string(),
            limit: 10,
            offset: 0,
        };
        let params = build_query("secret", &req);
        assert!(params.contains(&("search", "bogota".to_string())));
    }
}

#[cfg(all(test, feature = "net-tests"))]
mod net_tests {
    use super::{spawn_fetcher, FetchMessage, FetchRequest};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fetch_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let body = r#"{"pagination":{"limit":1,"offset":0,"count":1,"total":1},"data":[{"iata_code":"BOG"}]}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/json\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        let (req_tx, req_rx) = mpsc::channel();
        let (res_tx, res_rx) = mpsc::channel();
        spawn_fetcher(
            format!("http://{addr}"),
            "key".to_string(),
            Duration::from_secs(5),
            req_rx,
            res_tx,
        );
        req_tx
            .send(FetchRequest {
                seq: 7,
                query: String::new(),
                limit: 1,
                offset: 0,
            })
            .unwrap();

        match res_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FetchMessage::Results { seq, data } => {
                assert_eq!(seq, 7);
                assert_eq!(data.data.len(), 1);
                assert_eq!(data.data[0].iata_code.as_deref(), Some("BOG"));
            }
            other => panic!("expected results, got {other:?}"),
        }
    }
}
