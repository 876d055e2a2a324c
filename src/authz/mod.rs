/*!
 * Authorization core
 *
 * Responsibility:
 * - 認証済み Principal から claim を取り出す (principal)
 * - リソース所有者チェック (ownership) / claim ベースのポリシー (claims_policy)
 * - 判定結果 Allow/Deny (decision)
 *
 * HTTP / axum には依存しない。middleware から明示的に引数を渡して呼ぶ。
 */
pub mod claims_policy;
pub mod decision;
pub mod ownership;
pub mod principal;

pub use claims_policy::ClaimsPolicy;
pub use decision::Decision;
pub use ownership::{ImageId, OwnershipPolicy};
pub use principal::Principal;
