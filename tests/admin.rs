mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::{bearer, TestDb};
use hospital_server::auth::Role;

#[actix_web::test]
async fn registers_people_and_rejects_duplicates() {
    let db = TestDb::new();
    let admin_id = db.add_admin("root@hospital.test");
    let admin = db.token(admin_id, Role::Admin);
    let app = test::init_service(db.app()).await;

    let patient = json!({
        "name": "Ana",
        "national_id": "12345678901",
        "birth_date": "1990-05-04",
        "email": "ana@x.test",
        "password": "pw",
    });
    let req = test::TestRequest::post()
        .uri("/administracao/admin/pacientes")
        .insert_header(bearer(&admin))
        .set_json(&patient)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/administracao/admin/pacientes")
        .insert_header(bearer(&admin))
        .set_json(&patient)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/administracao/admin/profissionais")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "name": "Dr. Souza",
            "license": "CRM-7",
            "email": "souza@x.test",
            "password": "pw",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/administracao/admin/profissionais")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "name": "Other",
            "license": "CRM-8",
            "email": "souza@x.test",
            "password": "pw",
            "kind": "nurse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/administracao/profissionais")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["professionals"].as_array().unwrap().len(), 1);
    assert_eq!(body["professionals"][0]["kind"], "doctor");

    let req = test::TestRequest::get()
        .uri("/administracao/pacientes")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["patients"][0]["birth_date"], "1990-05-04");

    let req = test::TestRequest::get()
        .uri("/administracao/administradores")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admins"][0]["email"], "root@hospital.test");

    // the registered patient can log in
    let req = test::TestRequest::post()
        .uri("/pacientes/login")
        .set_json(json!({"email": "ana@x.test", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn admission_lifecycle() {
    let db = TestDb::new();
    let admin_id = db.add_admin("root@hospital.test");
    let admin = db.token(admin_id, Role::Admin);
    let ana = db.add_patient("Ana", "12345678901", "ana@x.test");
    let bruno = db.add_patient("Bruno", "22345678901", "bruno@x.test");
    let app = test::init_service(db.app()).await;

    let req = test::TestRequest::post()
        .uri("/administracao/leitos")
        .insert_header(bearer(&admin))
        .set_json(json!({"number": "101-A", "kind": "ward"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let bed_id = body["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/administracao/leitos")
        .insert_header(bearer(&admin))
        .set_json(json!({"number": "101-A"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/administracao/internacoes")
        .insert_header(bearer(&admin))
        .set_json(json!({"patient_id": ana, "bed_id": bed_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["patient_name"], "Ana");
    let admission_id = body["admission"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/administracao/internacoes")
        .insert_header(bearer(&admin))
        .set_json(json!({"patient_id": bruno, "bed_id": bed_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/administracao/internacoes")
        .insert_header(bearer(&admin))
        .set_json(json!({"patient_id": bruno, "bed_id": 999}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/administracao/leitos")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["beds"][0]["occupied"], true);
    assert_eq!(body["beds"][0]["patient_id"], ana);

    let req = test::TestRequest::put()
        .uri(&format!("/administracao/internacoes/{}/alta", admission_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/administracao/internacoes/{}/alta", admission_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/administracao/internacoes")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admissions"][0]["active"], false);

    let req = test::TestRequest::get()
        .uri("/administracao/leitos")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["beds"][0]["occupied"], false);
}
