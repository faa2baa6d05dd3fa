use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    entities::contact_message::ClientInfo,
    settings::AppConfig,
    utils::get_client_ip::get_client_ip,
};

/// Client address and user agent of the current request.
/// X-Forwarded-For is honoured only when `trust_x_forwarded_for` is set.
#[derive(Debug)]
pub struct RequestClient(pub ClientInfo);

impl FromRequest for RequestClient {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let trust_forwarded = req
            .app_data::<web::Data<AppConfig>>()
            .map(|config| config.trust_x_forwarded_for)
            .unwrap_or(false);

        let user_agent = req
            .headers()
            .get(actix_web::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        ready(Ok(RequestClient(ClientInfo {
            ip_address: get_client_ip(req, trust_forwarded),
            user_agent,
        })))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    async fn extract(req: HttpRequest) -> ClientInfo {
        RequestClient::extract(&req).await.unwrap().0
    }

    #[actix_rt::test]
    async fn forwarded_header_is_ignored_unless_trusted() {
        let mut config = AppConfig::for_testing();
        config.trust_x_forwarded_for = false;

        let req = TestRequest::default()
            .app_data(web::Data::new(config))
            .peer_addr("10.0.0.9:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("User-Agent", "curl/8.0"))
            .to_http_request();

        let info = extract(req).await;
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.9"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[actix_rt::test]
    async fn first_forwarded_address_is_used_when_trusted() {
        let req = TestRequest::default()
            .app_data(web::Data::new(AppConfig::for_testing()))
            .peer_addr("10.0.0.9:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();

        let info = extract(req).await;
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.user_agent, None);
    }
}
