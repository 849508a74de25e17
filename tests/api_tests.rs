use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use six_bridge::{api, AppState, Database};

fn app_de_prueba() -> Router {
    let db = Database::en_memoria().unwrap();
    db.asegurar_admin("admin@test.cl", "secreto").unwrap();
    api::crear_router(Arc::new(AppState::new(db)))
}

async fn json_de(respuesta: axum::response::Response) -> serde_json::Value {
    let body = respuesta.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"email":"{}","password":"{}"}}"#,
                    email, password
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    (status, json_de(res).await)
}

#[tokio::test]
async fn rutas_protegidas_exigen_token() {
    let app = app_de_prueba();

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/usuario")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/usuario")
                .header(header::AUTHORIZATION, "Bearer token-inventado")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_entrega_token_utilizable() {
    let app = app_de_prueba();

    // credenciales malas
    let (status, cuerpo) = login(&app, "admin@test.cl", "equivocada").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(cuerpo["error"].as_str().unwrap().contains("incorrectos"));

    // credenciales buenas
    let (status, cuerpo) = login(&app, "admin@test.cl", "secreto").await;
    assert_eq!(status, StatusCode::OK);
    let token = cuerpo["token"].as_str().unwrap().to_string();
    assert_eq!(cuerpo["usuario"]["role"], "administrador");

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/usuario")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let usuario = json_de(res).await;
    assert_eq!(usuario["email"], "admin@test.cl");

    // logout invalida el token
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/usuario")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn costos_envio_por_http() {
    let app = app_de_prueba();
    let (_, cuerpo) = login(&app, "admin@test.cl", "secreto").await;
    let token = cuerpo["token"].as_str().unwrap().to_string();

    // alta de un rango
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/costosenvio")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"min_total":0,"max_total":20000,"costo":3000}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let rango = json_de(res).await;
    assert_eq!(rango["costo"], 3000.0);
    let rango_id = rango["id"].as_i64().unwrap();

    // listado lo incluye
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/costosenvio")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listado = json_de(res).await;
    assert_eq!(listado.as_array().unwrap().len(), 1);

    // baja
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/costosenvio/{}", rango_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // borrar dos veces es 404
    let res = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/costosenvio/{}", rango_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
