//! Backend endpoint paths

pub fn login() -> String {
    "/auth/login_service_account".to_string()
}

pub fn trigger_test_run(test_case_id: &str) -> String {
    format!("/test-run/{}", test_case_id)
}

pub fn test_run(run_id: &str) -> String {
    format!("/test-run/{}", run_id)
}

pub fn trigger_collection(collection_id: &str) -> String {
    format!("/test-suites/collection/{}/run-all", collection_id)
}

pub fn collection(collection_id: &str) -> String {
    format!("/test-suites/collection/{}", collection_id)
}
