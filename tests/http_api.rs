use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use actix_web::{
    http::{header::ContentType, StatusCode},
    test, web, App,
};
use diesel::{connection::SimpleConnection, Connection, SqliteConnection};
use tempfile::TempDir;

use sensor_server::{
    api, RandomCaptor, ReadingStore, SensorService, SensorStatus, SqliteDatabase, TemperatureSource,
    ThresholdStore, Thresholds, HISTORY_LENGTH,
};

/// Random unless told what to return.
#[derive(Clone, Default)]
struct MockCaptor(Arc<Mutex<Option<f64>>>);

impl MockCaptor {
    fn returns(&self, temperature: f64) {
        *self.0.lock().unwrap() = Some(temperature);
    }
}

impl TemperatureSource for MockCaptor {
    fn read(&self) -> f64 {
        self.0.lock().unwrap().unwrap_or_else(|| RandomCaptor.read())
    }
}

struct Fixture {
    _dir: TempDir,
    path: String,
    captor: MockCaptor,
    service: web::Data<SensorService<MockCaptor, SqliteDatabase>>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor.sqlite3");
        let path = path.to_str().unwrap().to_string();
        let database = SqliteDatabase::open(&path, 2).unwrap();
        let captor = MockCaptor::default();
        let service = web::Data::new(SensorService::new(captor.clone(), database));
        Fixture {
            _dir: dir,
            path,
            captor,
            service,
        }
    }

    fn db(&self) -> &SqliteDatabase {
        self.service.database()
    }

    fn execute_sql(&self, sql: &str) {
        let mut conn = SqliteConnection::establish(&self.path).unwrap();
        conn.batch_execute(sql).unwrap();
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data($fixture.service.clone())
                .configure(api::configure::<MockCaptor, SqliteDatabase>)
                .default_service(web::route().to(api::not_found)),
        )
        .await
    };
}

macro_rules! get_status {
    ($app:expr) => {{
        let req = test::TestRequest::get().uri("/sensor").to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        std::str::from_utf8(&body).unwrap().parse::<SensorStatus>().unwrap()
    }};
}

macro_rules! get_history {
    ($app:expr) => {{
        let req = test::TestRequest::get().uri("/sensor/history").to_request();
        let history: Vec<SensorStatus> = test::call_and_read_body_json(&$app, req).await;
        history
    }};
}

#[actix_web::test]
async fn ping_leaves_thresholds_alone() {
    let fixture = Fixture::new();
    fixture.db().set_thresholds(&Thresholds::new(1.0, 2.0)).unwrap();
    let app = init_app!(fixture);

    for uri in ["/ping", "/sensor/ping"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "pong");
    }

    assert_eq!(fixture.db().get_thresholds().unwrap(), Thresholds::new(1.0, 2.0));
}

#[actix_web::test]
async fn status_is_one_of_the_bands() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    for uri in ["/", "/sensor"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(["HOT", "COLD", "WARM"].contains(&text), "unexpected body {}", text);
    }
}

#[actix_web::test]
async fn no_data_when_no_call() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    assert_eq!(fixture.db().count_readings().unwrap(), 0);

    let req = test::TestRequest::get().uri("/history").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn one_row_per_status_call() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    for i in 1..=HISTORY_LENGTH {
        get_status!(app);
        assert_eq!(fixture.db().count_readings().unwrap(), i);
    }
}

#[actix_web::test]
async fn history_matches_calls() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let mut results = Vec::new();
    for i in 1..=HISTORY_LENGTH {
        results.push(get_status!(app));
        let history = get_history!(app);
        assert_eq!(history.len(), i);
        assert_eq!(history, results);
    }
}

#[actix_web::test]
async fn history_limited_to_fifteen() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let mut results = VecDeque::with_capacity(HISTORY_LENGTH + 1);
    for i in 1..=2 * HISTORY_LENGTH {
        results.push_back(get_status!(app));
        if results.len() > HISTORY_LENGTH {
            results.pop_front();
        }

        let history = get_history!(app);
        assert_eq!(history.len(), i.min(HISTORY_LENGTH));
        assert_eq!(history, Vec::from(results.clone()));
    }
}

#[actix_web::test]
async fn mocked_captor_default_thresholds() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    for (temperature, expected) in [
        (10.0, SensorStatus::COLD),
        (30.0, SensorStatus::WARM),
        (50.0, SensorStatus::HOT),
        (20.0, SensorStatus::WARM),
        (42.0, SensorStatus::WARM),
    ] {
        fixture.captor.returns(temperature);
        assert_eq!(get_status!(app), expected, "reading {}", temperature);
    }
}

#[actix_web::test]
async fn change_thresholds() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::put()
        .uri("/sensor/thresholds")
        .set_json(Thresholds::new(5.0, 15.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test::read_body(resp).await.is_empty());

    fixture.captor.returns(10.0);
    assert_eq!(get_status!(app), SensorStatus::WARM);

    let req = test::TestRequest::get().uri("/thresholds").to_request();
    let thresholds: Thresholds = test::call_and_read_body_json(&app, req).await;
    assert_eq!(thresholds, Thresholds::new(5.0, 15.0));
}

#[actix_web::test]
async fn history_follows_new_thresholds() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    fixture.captor.returns(30.0);
    get_status!(app);
    fixture.captor.returns(15.0);
    get_status!(app);
    fixture.captor.returns(5.0);
    get_status!(app);
    assert_eq!(
        get_history!(app),
        vec![SensorStatus::WARM, SensorStatus::COLD, SensorStatus::COLD]
    );

    let req = test::TestRequest::put()
        .uri("/thresholds")
        .set_json(Thresholds::new(10.0, 20.0))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(
        get_history!(app),
        vec![SensorStatus::HOT, SensorStatus::WARM, SensorStatus::COLD]
    );
}

#[actix_web::test]
async fn inconsistent_thresholds_rejected() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    for (cold, hot) in [(15.0, 5.0), (7.0, 7.0)] {
        let req = test::TestRequest::put()
            .uri("/thresholds")
            .set_json(Thresholds::new(cold, hot))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("thresholds.cold"));
    }

    assert_eq!(fixture.db().get_thresholds().unwrap(), Thresholds::default());
}

#[actix_web::test]
async fn malformed_thresholds_body() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::put()
        .uri("/thresholds")
        .insert_header(ContentType::json())
        .set_payload(r#"{"cold": 1"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fixture.db().get_thresholds().unwrap(), Thresholds::default());
}

#[actix_web::test]
async fn unknown_route() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/sensor/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn missing_thresholds_is_a_server_error() {
    let fixture = Fixture::new();
    fixture.execute_sql("DELETE FROM Thresholds;");
    let app = init_app!(fixture);

    fixture.captor.returns(30.0);
    for uri in ["/", "/history", "/thresholds", "/sensor"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "GET {}", uri);
    }

    // The reading is stored before thresholds are looked up.
    assert_eq!(fixture.db().count_readings().unwrap(), 2);
    assert_eq!(fixture.db().last_readings(HISTORY_LENGTH).unwrap(), vec![30.0, 30.0]);

    let req = test::TestRequest::put()
        .uri("/thresholds")
        .set_json(Thresholds::new(10.0, 20.0))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(
        get_history!(app),
        vec![SensorStatus::HOT, SensorStatus::HOT]
    );
}
