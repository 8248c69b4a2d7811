//! Tool implementations exposed by the provider.

pub mod diagnostics;
pub mod vowels;
pub mod weather;

pub use diagnostics::SystemDiagnostics;
pub use vowels::count_vowels;
pub use weather::GetWeather;
