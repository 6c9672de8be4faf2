use super::ErrorCode;

pub fn all_codes() -> &'static [ErrorCode] {
    &[
        ErrorCode::ConfigInvalidJson,
        ErrorCode::ConfigInvalidValue,
        ErrorCode::ValidationInvalidArgument,
        ErrorCode::NamespaceNotFound,
        ErrorCode::GroupNotFound,
        ErrorCode::TemplateLintFailed,
        ErrorCode::TemplateRenderFailed,
        ErrorCode::ApplyFailed,
        ErrorCode::EngineSpawnFailed,
        ErrorCode::InternalIoError,
        ErrorCode::InternalJsonError,
        ErrorCode::InternalUnexpected,
    ]
}
