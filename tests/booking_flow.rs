mod common;

use std::{
    sync::{Arc, Barrier},
    thread,
};

use actix_web::{http::StatusCode, test};
use chrono::NaiveTime;
use serde_json::{json, Value};

use common::{bearer, TestDb};
use hospital_server::{
    auth::{Identity, Role},
    booking::{self, registry, BookingRequest},
    error::ServiceError,
    models::professionals::KIND_DOCTOR,
};

#[actix_web::test]
async fn book_cancel_reschedule_over_http() {
    let db = TestDb::new();
    let doctor_id = db.add_professional("Dr. Souza", "CRM-7", "doctor");
    let patient_id = db.add_patient("Ana", "33333333333", "ana@x.test");
    let doctor = db.token(doctor_id, Role::Professional);
    let patient = db.token(patient_id, Role::Patient);
    let app = test::init_service(db.app()).await;

    let req = test::TestRequest::post()
        .uri("/profissionais/agendas")
        .insert_header(bearer(&doctor))
        .set_json(json!({"date": "2024-01-10"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let schedule_id = body["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/profissionais/agendas/{}/horarios", schedule_id))
        .insert_header(bearer(&doctor))
        .set_json(json!({"times": ["09:00", "09:30", "09:00"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["created"].as_array().unwrap().len(), 2);
    assert_eq!(body["ignored"], json!(["09:00"]));
    let second_slot = body["created"][1]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/pacientes/agendas/horarios")
        .insert_header(bearer(&patient))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["schedules"][0]["slots"].as_array().unwrap().len(), 2);

    let book_body = json!({
        "schedule_id": schedule_id,
        "time": "09:00",
        "patient_id": patient_id,
    });
    let req = test::TestRequest::post()
        .uri("/pacientes/consultas")
        .insert_header(bearer(&patient))
        .set_json(&book_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["booking"]["status"], "scheduled");
    assert_eq!(body["booking"]["time"], "09:00");
    let booking_id = body["booking"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/pacientes/consultas")
        .insert_header(bearer(&patient))
        .set_json(&book_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri(&format!("/pacientes/consultas/{}/remarcar", booking_id))
        .insert_header(bearer(&patient))
        .set_json(json!({"new_slot_id": second_slot}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["booking"]["time"], "09:30");

    let req = test::TestRequest::put()
        .uri(&format!("/pacientes/consultas/{}/cancelar", booking_id))
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/pacientes/consultas/{}/cancelar", booking_id))
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/pacientes/consultas/historico/{}", patient_id))
        .insert_header(bearer(&patient))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bookings"][0]["status"], "cancelled");

    let req = test::TestRequest::get()
        .uri(&format!("/pacientes/notificacoes/{}", patient_id))
        .insert_header(bearer(&patient))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let notes = body["notifications"].as_array().unwrap();
    assert_eq!(notes.len(), 3);
    let note_id = notes[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/pacientes/notificacoes/{}/ler", note_id))
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/profissionais/agendas/{}", schedule_id))
        .insert_header(bearer(&doctor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn bad_paths_and_foreign_records() {
    let db = TestDb::new();
    let patient_id = db.add_patient("Ana", "33333333333", "ana@x.test");
    let other_id = db.add_patient("Bruno", "44444444444", "bruno@x.test");
    let patient = db.token(patient_id, Role::Patient);
    let app = test::init_service(db.app()).await;

    let req = test::TestRequest::put()
        .uri("/pacientes/consultas/abc/cancelar")
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/pacientes/consultas/999/cancelar")
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/pacientes/consultas/historico/{}", other_id))
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/pacientes/consultas")
        .insert_header(bearer(&patient))
        .set_json(json!({"schedule_id": 1, "time": "9h", "patient_id": patient_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn nurses_cannot_open_schedules() {
    let db = TestDb::new();
    let nurse_id = db.add_professional("Enf. Rosa", "COREN-1", "nurse");
    let nurse = db.token_with_kind(nurse_id, Role::Professional, Some("nurse".to_string()));
    let app = test::init_service(db.app()).await;

    let req = test::TestRequest::post()
        .uri("/profissionais/agendas")
        .insert_header(bearer(&nurse))
        .set_json(json!({"date": "2024-01-10"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn records_exams_and_history() {
    let db = TestDb::new();
    let doctor_id = db.add_professional("Dr. Souza", "CRM-7", "doctor");
    let patient_id = db.add_patient("Ana Lima", "33333333333", "ana@x.test");
    let doctor = db.token(doctor_id, Role::Professional);
    let patient = db.token(patient_id, Role::Patient);
    let app = test::init_service(db.app()).await;

    let req = test::TestRequest::post()
        .uri("/profissionais/prontuarios")
        .insert_header(bearer(&doctor))
        .set_json(json!({"patient_id": patient_id, "description": "routine check"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/profissionais/receitas")
        .insert_header(bearer(&doctor))
        .set_json(json!({"patient_id": 999, "content": "rest"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/profissionais/exames")
        .insert_header(bearer(&doctor))
        .set_json(json!({
            "patient_id": patient_id,
            "name": "blood count",
            "scheduled_at": "2024-02-01T08:00:00",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let exam_id = body["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/pacientes/exames/{}", exam_id))
        .insert_header(bearer(&patient))
        .set_json(json!({"scheduled_at": "2024-02-03T10:30:00"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["exam"]["scheduled_at"], "2024-02-03T10:30:00");

    let req = test::TestRequest::get()
        .uri("/profissionais/pacientes/historico?name=lima")
        .insert_header(bearer(&doctor))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["patient"]["id"], patient_id);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["exams"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/profissionais/pacientes/historico")
        .insert_header(bearer(&doctor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/profissionais/teleconsulta")
        .insert_header(bearer(&doctor))
        .set_json(json!({"patient_id": patient_id}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["video_link"],
        format!("https://vc.test/sessions/patients/{}", patient_id)
    );

    let req = test::TestRequest::post()
        .uri("/telemedicina/sessao")
        .insert_header(bearer(&doctor))
        .set_json(json!({"video_link": "https://meet.test/abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["video_link"], "https://meet.test/abc");

    let req = test::TestRequest::post()
        .uri("/telemedicina/sessao")
        .insert_header(bearer(&patient))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[::core::prelude::v1::test]
fn concurrent_bookings_claim_a_slot_once() {
    let db = TestDb::new();
    let doctor_id = db.add_professional("Dr. Souza", "CRM-7", "doctor");
    let first = db.add_patient("Ana", "33333333333", "ana@x.test");
    let second = db.add_patient("Bruno", "44444444444", "bruno@x.test");

    let doctor = Identity::professional(doctor_id, KIND_DOCTOR);
    let schedule = {
        let mut conn = db.conn();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let schedule = registry::create_schedule(&mut conn, &doctor, doctor_id, date).unwrap();
        registry::publish_slots(&mut conn, &doctor, schedule.id, &["09:00"]).unwrap();
        schedule
    };

    let barrier = Arc::new(Barrier::new(2));
    let handles = [first, second]
        .into_iter()
        .map(|patient_id| {
            let pool = db.pool.clone();
            let barrier = barrier.clone();
            let base = db.config.telemedicine_base_url.clone();
            let schedule_id = schedule.id;
            thread::spawn(move || {
                let mut conn = pool.get().unwrap();
                let who = Identity::new(patient_id, Role::Patient);
                let req = BookingRequest {
                    schedule_id,
                    time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    patient_id,
                    is_remote: false,
                };
                barrier.wait();
                booking::book(&mut conn, &who, req, &base)
            })
        })
        .collect::<Vec<_>>();

    let results = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Vec<_>>();
    let booked = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(booked, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(ServiceError::SlotUnavailable))));
}
