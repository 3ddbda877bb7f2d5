// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use token_dashboard_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_parameter() {
        let err = CoreError::InvalidParameter("start_value must be positive".into());
        assert_eq!(err.to_string(), "Invalid parameter: start_value must be positive");
    }

    #[test]
    fn not_found() {
        let err = CoreError::NotFound("Volume point at timestamp 0".into());
        assert_eq!(err.to_string(), "Not found: Volume point at timestamp 0");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected end".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected end");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&CoreError::NotFound("x".into()));
    }
}
