/*!
 * Request extractors
 *
 * Public API:
 * - PrincipalExtractor (access middleware が入れた Principal を handler に渡す)
 */
mod principal;

pub use principal::PrincipalExtractor;
