/// 通过 ctor 在启动前注册缓存插件，类型需提供 `new() -> Result<Self, String>`
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            use std::sync::Arc;
            use $crate::cache::register::register_object_cache_plugin;

            register_object_cache_plugin(
                $name,
                Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new().map_err($crate::errors::LmsError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::traits::ObjectCache>)
                    })
                }),
            );
        }
    };
}
