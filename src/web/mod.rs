pub mod account;
pub mod error;
pub mod login;
pub mod logout;
pub mod menus;
pub mod restaurants;
pub mod votes;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Descending order. Order is important.
    // Route resolution will stop at the first match.
    votes::configure(conf);
    menus::configure(conf);
    restaurants::configure(conf);
    account::configure(conf);
    login::configure(conf);
    logout::configure(conf);

    conf.service(crate::create_user::create_user_post);
}

/// Extractor configuration shared by the server and the tests, so malformed
/// requests get the same JSON error bodies as everything else.
pub fn configure_extractors(conf: &mut actix_web::web::ServiceConfig) {
    conf.app_data(actix_web::web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(actix_web::web::PathConfig::default().error_handler(error::path_error_handler));
}
