use std::time::Duration;

use actix_web::{
    dev::Server,
    guard,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use bidfair_engine::{
    db_types::Role,
    events::EventProducers,
    AccountApi,
    BidFlowApi,
    SqliteDatabase,
    VerificationApi,
};

use crate::{
    auth::{TokenIssuer, TokenValidator},
    config::ServerConfig,
    errors::ServerError,
    middleware::{AclMiddlewareFactory, JwtMiddlewareFactory},
    notify,
    routes::{
        accept_bid,
        assign_categories,
        categories,
        create_order,
        customer_auth_request,
        customer_auth_verify,
        health,
        my_orders,
        order_bids,
        order_confirm,
        order_request,
        partner_auth_register,
        partner_auth_request,
        partner_auth_verify,
        partner_open_orders,
        submit_bid,
    },
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = notify::create_event_handlers(EVENT_BUFFER_SIZE);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let bid_flow_api = BidFlowApi::new(db.clone(), producers.clone());
        let verification_api = VerificationApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let jwt_validator = TokenValidator::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bidfair::access_log"))
            .app_data(web::Data::new(bid_flow_api))
            .app_data(web::Data::new(verification_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(jwt_signer));
        // Routes that require authentication. The JWT middleware establishes the caller's
        // identity; each resource then demands the matching role.
        let auth_scope = web::scope("/api")
            .wrap(JwtMiddlewareFactory::new(jwt_validator))
            .service(
                web::resource("/orders")
                    .guard(guard::Post())
                    .wrap(AclMiddlewareFactory::new(Role::Customer))
                    .to(create_order::<SqliteDatabase>),
            )
            .service(
                web::resource("/orders")
                    .guard(guard::Get())
                    .wrap(AclMiddlewareFactory::new(Role::Customer))
                    .to(my_orders::<SqliteDatabase>),
            )
            .service(
                web::resource("/orders/{order_id}/bids")
                    .guard(guard::Get())
                    .wrap(AclMiddlewareFactory::new(Role::Customer))
                    .to(order_bids::<SqliteDatabase>),
            )
            .service(
                web::resource("/orders/{order_id}/bids")
                    .guard(guard::Post())
                    .wrap(AclMiddlewareFactory::new(Role::Partner))
                    .to(submit_bid::<SqliteDatabase>),
            )
            .service(
                web::resource("/orders/{order_id}/bids/{bid_id}/accept")
                    .guard(guard::Post())
                    .wrap(AclMiddlewareFactory::new(Role::Customer))
                    .to(accept_bid::<SqliteDatabase>),
            )
            .service(
                web::resource("/partner/orders")
                    .guard(guard::Get())
                    .wrap(AclMiddlewareFactory::new(Role::Partner))
                    .to(partner_open_orders::<SqliteDatabase>),
            )
            .service(
                web::resource("/partner/categories")
                    .guard(guard::Put())
                    .wrap(AclMiddlewareFactory::new(Role::Partner))
                    .to(assign_categories::<SqliteDatabase>),
            );
        let auth_routes = web::scope("/auth")
            .service(
                web::resource("/customer/request").guard(guard::Post()).to(customer_auth_request::<SqliteDatabase>),
            )
            .service(web::resource("/customer/verify").guard(guard::Post()).to(customer_auth_verify::<SqliteDatabase>))
            .service(
                web::resource("/partner/register").guard(guard::Post()).to(partner_auth_register::<SqliteDatabase>),
            )
            .service(web::resource("/partner/request").guard(guard::Post()).to(partner_auth_request::<SqliteDatabase>))
            .service(web::resource("/partner/verify").guard(guard::Post()).to(partner_auth_verify::<SqliteDatabase>));
        app.service(health)
            .service(web::resource("/categories").guard(guard::Get()).to(categories::<SqliteDatabase>))
            .service(auth_routes)
            .service(web::resource("/orders/request").guard(guard::Post()).to(order_request::<SqliteDatabase>))
            .service(web::resource("/orders/confirm").guard(guard::Post()).to(order_confirm::<SqliteDatabase>))
            .service(auth_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
