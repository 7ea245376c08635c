//! 通用宏

/// 以字段默认值列表实现 `Default`
///
/// ```rust
/// use sdl_lua::impl_default;
///
/// struct Viewport {
///     width: u32,
///     height: u32,
/// }
///
/// impl_default!(Viewport {
///     width: 800,
///     height: 600,
/// });
///
/// assert_eq!(Viewport::default().width, 800);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
