use std::convert::Infallible;

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};
use trading_model::model::TimeStampMs;

use super::{Tick, Tickers};

/// Timepoint used when `timestamp` is missing or malformed.
pub const MAX_TIMEPOINT: TimeStampMs = u64::MAX;

/// Read the `timestamp` query parameter in milliseconds.
pub fn get_time_point(query: Option<&str>) -> TimeStampMs {
    let timestamp = query
        .into_iter()
        .flat_map(|query| query.split('&'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "timestamp")
        .map(|(_, value)| value)
        .unwrap_or("");
    match timestamp.parse::<TimeStampMs>() {
        Ok(timepoint) => {
            debug!("Interpreted timestamp({timestamp}) to {timepoint}");
            timepoint
        }
        Err(_) => {
            debug!("Interpreted timestamp({timestamp}) to default - {MAX_TIMEPOINT}");
            MAX_TIMEPOINT
        }
    }
}

fn json_response(status: StatusCode, body: Value) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub(super) async fn handle(req: Request<Body>, tickers: Tickers) -> Result<Response<Body>, Infallible> {
    let tick = match (req.method(), Tick::from_path(req.uri().path())) {
        (&Method::GET, Some(tick)) => tick,
        _ => return Ok(json_response(StatusCode::NOT_FOUND, json!({"success": false}))),
    };
    let timepoint = get_time_point(req.uri().query());
    if let Err(err) = tickers.send(tick, timepoint).await {
        warn!(path = tick.path(), "tick dropped, consumer is gone: {err}");
        return Ok(json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"success": false, "reason": "tick consumer is gone"}),
        ));
    }
    Ok(json_response(StatusCode::OK, json!({"success": true})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_time_point() {
        assert_eq!(get_time_point(Some("timestamp=1518684000000")), 1518684000000);
        assert_eq!(get_time_point(Some("foo=bar&timestamp=42")), 42);
        assert_eq!(get_time_point(None), MAX_TIMEPOINT);
        assert_eq!(get_time_point(Some("")), MAX_TIMEPOINT);
        assert_eq!(get_time_point(Some("timestamp=")), MAX_TIMEPOINT);
        assert_eq!(get_time_point(Some("timestamp=-5")), MAX_TIMEPOINT);
        assert_eq!(get_time_point(Some("timestamp=12ab")), MAX_TIMEPOINT);
        assert_eq!(get_time_point(Some("time=12")), MAX_TIMEPOINT);
    }

    #[test]
    fn test_tick_paths() {
        for tick in Tick::ALL {
            assert_eq!(Tick::from_path(tick.path()), Some(tick));
        }
        assert_eq!(Tick::from_path("/ttick"), Some(Tick::TradeHistory));
        assert_eq!(Tick::from_path("/xtick"), None);
        assert_eq!(Tick::from_path("/ttick/"), None);
    }
}
