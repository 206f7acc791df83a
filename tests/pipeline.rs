mod common;

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::Level;

use common::{MemorySink, TestFault};
use ledgerline::middleware::{Next, Pipeline, RequestLogging, from_fn};
use ledgerline::{BoxError, Request, Response, respond};

const BALANCES: &str = "/api/Transaction/GetLast12MonthBalances";
const FAULT: &str = "Test middleware exception.";

fn logging_pipeline(sink: &Arc<MemorySink>, fail: bool) -> Pipeline {
    Pipeline::builder(sink.clone())
        .stage_with(RequestLogging::new)
        .terminal_fn(move |req: Request| async move {
            if fail {
                return Err(TestFault(FAULT.to_owned()));
            }
            Ok(Response::json(format!(r#"{{"path":"{}"}}"#, req.path())))
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn success_logs_entering_then_leaving_and_keeps_the_response() {
    let sink = MemorySink::shared();
    let pipeline = logging_pipeline(&sink, false);

    let res = pipeline.handle(Request::new(Method::GET, BALANCES)).await.unwrap();

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), format!(r#"{{"path":"{BALANCES}"}}"#).as_bytes());
    assert_eq!(
        sink.messages(),
        [format!("Entering {BALANCES}"), format!("Leaving {BALANCES}")]
    );
    assert!(sink.records().iter().all(|r| r.level == Level::INFO));
    assert!(sink.records().iter().all(|r| r.source == RequestLogging::SOURCE));
}

#[tokio::test]
async fn failure_logs_the_message_and_reraises_the_same_error() {
    let sink = MemorySink::shared();
    let pipeline = logging_pipeline(&sink, true);

    let err = pipeline.handle(Request::new(Method::GET, BALANCES)).await.unwrap_err();

    assert_eq!(err.downcast_ref::<TestFault>(), Some(&TestFault(FAULT.to_owned())));
    assert_eq!(err.to_string(), FAULT);

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, Level::INFO);
    assert_eq!(records[0].message, format!("Entering {BALANCES}"));
    assert_eq!(records[1].level, Level::ERROR);
    assert!(records[1].message.contains(FAULT));
}

#[tokio::test]
async fn repeated_invocations_log_identically() {
    let sink = MemorySink::shared();
    let pipeline = logging_pipeline(&sink, false);

    pipeline.handle(Request::new(Method::GET, BALANCES)).await.unwrap();
    let first = sink.records();
    sink.clear();
    pipeline.handle(Request::new(Method::GET, BALANCES)).await.unwrap();

    assert_eq!(first, sink.records());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_keep_their_own_records() {
    let sink = MemorySink::shared();
    let pipeline = Pipeline::builder(sink.clone())
        .stage_with(RequestLogging::new)
        .terminal_fn(|req: Request| async move {
            // odd-numbered paths fail
            let n: u32 = req.path().trim_start_matches("/r/").parse().unwrap_or(0);
            tokio::task::yield_now().await;
            if n % 2 == 1 {
                Err(TestFault(format!("failed {}", req.path())))
            } else {
                Ok(Response::text(req.path().to_owned()))
            }
        })
        .build()
        .unwrap();

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                let path = format!("/r/{n}");
                let out = pipeline.handle(Request::new(Method::GET, &path)).await;
                (n, path, out.map(|res| res.body().to_vec()).map_err(|e| e.to_string()))
            })
        })
        .collect();

    for handle in handles {
        let (n, path, out) = handle.await.unwrap();
        if n % 2 == 1 {
            assert_eq!(out, Err(format!("failed {path}")));
        } else {
            assert_eq!(out, Ok(path.clone().into_bytes()));
        }
    }

    let records = sink.records();
    assert_eq!(records.len(), 64);
    for n in 0..32 {
        let path = format!("/r/{n}");
        let own: Vec<_> = records
            .iter()
            // "/r/1" is a suffix of "/r/11"; match the whole trailing token
            .filter(|r| r.message.rsplit(' ').next() == Some(path.as_str()))
            .collect();
        assert_eq!(own.len(), 2, "records for {path}: {own:?}");
        assert_eq!(own[0].message, format!("Entering {path}"));
        if n % 2 == 1 {
            assert_eq!(own[1].level, Level::ERROR);
            assert_eq!(own[1].message, format!("failed {path}"));
        } else {
            assert_eq!(own[1].message, format!("Leaving {path}"));
        }
    }
}

#[tokio::test]
async fn translation_stage_outside_logging_turns_the_fault_into_a_response() {
    let sink = MemorySink::shared();
    let pipeline = Pipeline::builder(sink.clone())
        .stage(from_fn("translate", |req: Request, next: Next| async move {
            match next.run(req).await {
                Ok(res) => Ok::<_, BoxError>(res),
                Err(e) => Ok(Response::builder()
                    .status(StatusCode::SERVICE_UNAVAILABLE)
                    .text(e.to_string())),
            }
        }))
        .stage_with(RequestLogging::new)
        .terminal_fn(|_req: Request| async { Err::<Response, _>(TestFault(FAULT.to_owned())) })
        .build()
        .unwrap();

    let res = pipeline.handle(Request::new(Method::GET, BALANCES)).await.unwrap();

    assert_eq!(res.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body(), FAULT.as_bytes());
    assert_eq!(sink.messages(), [format!("Entering {BALANCES}"), FAULT.to_owned()]);
}

#[tokio::test]
async fn without_translation_the_host_answers_500() {
    let sink = MemorySink::shared();
    let pipeline = logging_pipeline(&sink, true);

    let res = respond(&pipeline, Request::new(Method::GET, BALANCES)).await;

    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(sink.messages(), [format!("Entering {BALANCES}"), FAULT.to_owned()]);
}

#[tokio::test]
async fn logging_sees_what_an_inner_stage_answered() {
    let sink = MemorySink::shared();
    let pipeline = Pipeline::builder(sink.clone())
        .stage_with(RequestLogging::new)
        .stage(from_fn("teapot", |_req: Request, _next: Next| async {
            Ok::<_, BoxError>(Response::status(StatusCode::IM_A_TEAPOT))
        }))
        .terminal_fn(|_req: Request| async { "never" })
        .build()
        .unwrap();

    let res = pipeline.handle(Request::new(Method::GET, "/tea")).await.unwrap();

    assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
    assert_eq!(sink.messages(), ["Entering /tea", "Leaving /tea"]);
}
