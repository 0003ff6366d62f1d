//! OAuth2 아이덴티티 서비스 메인 애플리케이션
//!
//! 설정을 읽고 사용자 저장소와 서비스를 조립한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use futures_util::FutureExt;
use log::{error, info};
use oauth_identity_service::caching::redis::RedisClient;
use oauth_identity_service::config::{AuthSettings, ServerConfig, StorageConfig, UserStoreKind};
use oauth_identity_service::core::registry::ServiceLocator;
use oauth_identity_service::db::Database;
use oauth_identity_service::domain::UserId;
use oauth_identity_service::errors::{AppError, AppResult};
use oauth_identity_service::repositories::users::{InMemoryUserRepository, MongoUserRepository, UserStore};
use oauth_identity_service::routes::configure_all_routes;
use oauth_identity_service::services::auth::{AuthService, IdentityReconciler, UserCreatedHook};
use oauth_identity_service::services::users::UserService;

#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 로거는 .env(RUST_LOG 포함) 로드 후에 초기화하고, 로드 결과는 그 뒤에 기록
    let env_file = load_env_file();
    init_logging();
    match env_file {
        Ok(loaded) => info!("{} 파일 로드 됨", loaded),
        Err(e) => error!("{}", e),
    }

    info!("🚀 OAuth2 아이덴티티 서비스 시작중...");

    if let Err(e) = initialize_services().await {
        error!("❌ 서비스 초기화 실패: {}", e);
        return Err(std::io::Error::other(e.to_string()));
    }

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server().await
}

/// 저장소, 인증 서비스, 사용자 서비스를 조립해 ServiceLocator에 등록합니다
async fn initialize_services() -> AppResult<()> {
    let settings = AuthSettings::from_env()?;
    let store = initialize_user_store().await?;

    let reconciler = IdentityReconciler::new(store.clone())
        .with_hook(user_directory_hook(StorageConfig::user_data_root()));
    let auth_service = AuthService::from_settings(&settings, reconciler);

    info!("🔐 활성화된 OAuth2 프로바이더: {:?}", auth_service.configured_providers());

    ServiceLocator::set(Arc::new(auth_service));
    ServiceLocator::set(Arc::new(UserService::new(store)));
    Ok(())
}

async fn initialize_user_store() -> AppResult<Arc<dyn UserStore>> {
    match StorageConfig::user_store() {
        UserStoreKind::Memory => {
            info!("🧪 메모리 사용자 저장소 사용 (재시작 시 데이터가 사라집니다)");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
        UserStoreKind::Mongo => {
            info!("📡 데이터베이스 연결 중...");
            let database = Arc::new(Database::new().await?);
            let redis_client = Arc::new(RedisClient::new().await?);

            let repository = MongoUserRepository::new(database, redis_client);
            repository.init().await?;
            Ok(Arc::new(repository))
        }
    }
}

/// 신규 사용자마다 `{root}/{user_id}` 디렉토리를 만드는 생성 후크
fn user_directory_hook(root: PathBuf) -> UserCreatedHook {
    Arc::new(move |user_id: UserId| {
        let path = root.join(user_id.to_string());
        async move {
            let created = path.clone();
            web::block(move || std::fs::create_dir_all(created))
                .await
                .map_err(|e| e.to_string())?
                .map_err(|e| format!("{}: {}", path.display(), e))?;

            info!("📁 사용자 디렉토리 생성: {}", path.display());
            Ok::<(), String>(())
        }
        .boxed()
    })
}

async fn start_http_server() -> std::io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            let e = AppError::ConfigError("Rate Limiting 설정이 올바르지 않습니다".to_string());
            error!("{}", e);
            std::io::Error::other(e.to_string())
        })?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

/// PROFILE(dev|prod)에 맞는 .env 파일을 로드하고 로드한 파일 이름을 돌려줍니다
fn load_env_file() -> Result<&'static str, String> {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let filename = env_file_for(&profile);

    let loaded = if filename == ".env" {
        dotenv().map(|_| ())
    } else {
        dotenv::from_filename(filename).map(|_| ())
    };

    loaded
        .map(|_| filename)
        .map_err(|e| format!("{} 파일 로드 실패 (PROFILE={}): {}", filename, profile, e))
}

fn env_file_for(profile: &str) -> &'static str {
    match profile {
        "prod" => ".env.prod",
        "dev" => ".env.dev",
        _ => ".env",
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

fn configure_cors() -> Cors {
    let origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

/// `RATE_LIMIT_PER_SECOND`(기본 100), `RATE_LIMIT_BURST_SIZE`(기본 200)
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
            200
        });

    let config = RateLimitConfig {
        per_second,
        burst_size,
    };

    info!("Rate Limiting 설정 로드됨: {:?}", config);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file_for_profile() {
        assert_eq!(env_file_for("dev"), ".env.dev");
        assert_eq!(env_file_for("prod"), ".env.prod");
        assert_eq!(env_file_for("staging"), ".env");
    }

    #[test]
    fn test_missing_env_file_is_returned_as_error() {
        // 로거 초기화 전에 호출되므로 실패는 값으로 돌려받는다
        if std::env::var("PROFILE").is_err() && !std::path::Path::new(".env.dev").exists() {
            let err = load_env_file().unwrap_err();
            assert!(err.contains(".env.dev"));
        }
    }
}
