/// Exit codes used by the `verify` binary.
///
/// Mapping:
///   0 — success (`VERIFY: PASS`)
///   2 — any failure (`VERIFY: FAIL (<message>)`)
///
/// No other exit codes are ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Failure = 2,
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> u8 {
        code as u8
    }
}
