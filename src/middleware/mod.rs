/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証 (access) / 認可 (ownership, policy)
 * - http / cors / security_headers: 横断的な HTTP 層
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
