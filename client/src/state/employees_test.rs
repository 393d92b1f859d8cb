use super::*;

use std::path::PathBuf;

use reqwest::Method;
use serde_json::json;

use crate::net::test_helpers::{MockBackend, Reply};
use crate::state::Severity;

fn photo_on_disk() -> PathBuf {
    let path = std::env::temp_dir().join(format!("ponto-employee-{}.jpg", uuid::Uuid::new_v4()));
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0, 1]).unwrap();
    path
}

fn employee(id: &str, name: &str) -> Employee {
    Employee {
        id: id.into(),
        name: name.into(),
        role: "Caixa".into(),
        photo_url: None,
        company_id: None,
        registered_on: None,
    }
}

#[test]
fn visible_filters_by_name_ignoring_case() {
    let list = EmployeeList {
        employees: vec![employee("f1", "Ana Souza"), employee("f2", "Bruno Lima")],
        filter: "  sou ".into(),
        ..EmployeeList::default()
    };

    let names: Vec<_> = list.visible().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Ana Souza"]);
}

#[tokio::test]
async fn load_failure_shows_server_error() {
    let backend = MockBackend::start(vec![Reply::json(
        Method::GET,
        "/funcionarios",
        500,
        json!({"error": "Erro ao listar funcionários"}),
    )])
    .await;
    let mut list = EmployeeList::default();

    list.load(&backend.client()).await;

    assert_eq!(list.notice.unwrap().message, "Erro ao listar funcionários");
    assert!(!list.loading);
}

#[tokio::test]
async fn delete_removes_employee_locally() {
    let backend = MockBackend::start(vec![Reply::json(
        Method::DELETE,
        "/funcionarios/f1",
        200,
        json!({"message": "Funcionário excluído"}),
    )])
    .await;
    let mut list = EmployeeList {
        employees: vec![employee("f1", "Ana"), employee("f2", "Bruno")],
        ..EmployeeList::default()
    };

    assert!(list.delete(&backend.client(), "f1").await);
    assert_eq!(list.employees.len(), 1);
    assert_eq!(list.notice.unwrap().message, DELETE_SUCCESS);
}

#[tokio::test]
async fn suggest_names_skips_blank_input() {
    let backend = MockBackend::start(vec![]).await;

    assert!(suggest_names(&backend.client(), "  ").await.is_empty());
    assert_eq!(backend.hit_count(), 0);
}

#[tokio::test]
async fn register_without_photo_sends_nothing() {
    let backend = MockBackend::start(vec![]).await;
    let mut form = RegisterEmployeeForm { name: "Carla".into(), role: "Caixa".into(), ..RegisterEmployeeForm::default() };

    assert!(!form.can_submit());
    assert!(form.submit(&backend.client()).await.is_none());
    assert_eq!(backend.hit_count(), 0);
    assert_eq!(form.notice.unwrap().message, ValidationError::MissingPhoto.to_string());
}

#[tokio::test]
async fn register_with_blank_name_sends_nothing() {
    let backend = MockBackend::start(vec![]).await;
    let mut form = RegisterEmployeeForm {
        role: "Caixa".into(),
        photo: Some(PhotoSource::file(photo_on_disk())),
        ..RegisterEmployeeForm::default()
    };

    assert!(form.submit(&backend.client()).await.is_none());
    assert_eq!(backend.hit_count(), 0);
}

#[tokio::test]
async fn register_success_resets_form_and_holds_gate() {
    let backend = MockBackend::start(vec![Reply::json(
        Method::POST,
        "/cadastrar_funcionario",
        200,
        json!({"success": true, "id": "f9", "nome": "Carla"}),
    )])
    .await;
    let mut form =
        RegisterEmployeeForm::new("Carla", "Caixa", Some(PhotoSource::file(photo_on_disk())), Duration::from_millis(10));
    assert!(form.can_submit());

    let presented = form.submit(&backend.client()).await.unwrap();

    assert!(presented.outcome.is_accepted());
    assert!(form.name.is_empty());
    assert!(form.photo.is_none());
    assert_eq!(form.notice.as_ref().unwrap().severity, Severity::Success);
    assert!(form.gate.is_busy());

    presented.dismiss().await;
    assert!(!form.gate.is_busy());
    assert_eq!(backend.hit_count(), 1);
}

#[tokio::test]
async fn edit_loads_then_saves_fields_without_photo() {
    let backend = MockBackend::start(vec![
        Reply::json(Method::GET, "/funcionarios/f1", 200, json!({"id": "f1", "nome": "Ana", "cargo": "Caixa"})),
        Reply::json(Method::PUT, "/funcionarios/f1", 200, json!({})),
    ])
    .await;
    let api = backend.client();
    let mut form = EditEmployeeForm::new("f1");

    assert!(form.load(&api).await);
    form.role = "Gerente".into();
    assert!(form.submit(&api).await);

    let put = &backend.hits()[1];
    assert!(put.body_text().contains("Gerente"));
    assert!(!put.body_text().contains("name=\"foto\""));
    assert_eq!(form.notice.unwrap().message, UPDATE_SUCCESS);
}

#[tokio::test]
async fn edit_with_new_photo_attaches_it() {
    let backend = MockBackend::start(vec![Reply::json(
        Method::PUT,
        "/funcionarios/f1",
        200,
        json!({"message": "Funcionário atualizado com sucesso!"}),
    )])
    .await;
    let mut form = EditEmployeeForm {
        name: "Ana".into(),
        role: "Caixa".into(),
        new_photo: Some(PhotoSource::file(photo_on_disk())),
        ..EditEmployeeForm::new("f1")
    };

    assert!(form.submit(&backend.client()).await);
    assert!(backend.hits()[0].body_text().contains("name=\"foto\""));
    assert!(form.new_photo.is_none());
    assert!(!form.gate.is_busy());
}

#[tokio::test]
async fn edit_with_blank_role_sends_nothing() {
    let backend = MockBackend::start(vec![]).await;
    let mut form = EditEmployeeForm { name: "Ana".into(), ..EditEmployeeForm::new("f1") };

    assert!(!form.submit(&backend.client()).await);
    assert_eq!(backend.hit_count(), 0);
}
