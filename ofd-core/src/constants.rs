/// Базовый адрес сервиса
pub const OFD_BASE_URL: &str = "https://ofd.ru";

/// Путь получения токена (POST)
pub const AUTH_PATH: &str = "/api/Authorization/CreateAuthToken";

/// Префикс путей integration API
pub const INTEGRATION_PATH: &str = "/api/integration/v1";

/// Формат дат в ответах и запросах
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Файл кэша токена по умолчанию
pub const DEFAULT_TOKEN_FILE: &str = "authtoken.json";

/// Максимальный период (в днях), который принимает сервис
pub const MAX_RANGE_DAYS: i64 = 30;

/// User-Agent для всех запросов к сервису
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.9; rv:45.0) Gecko/20100101 Firefox/45.0";
