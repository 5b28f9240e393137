use std::borrow::Cow;

#[hdac_derive::hdac_error]
pub enum ComposeError {
    #[error(
        "Fallback `{symbol}` needs `{primitive}`, which nothing provides{}",
        format_context(.context)
    )]
    UnmetPrimitive { symbol: String, primitive: String, context: Option<Cow<'static, str>> },
}
