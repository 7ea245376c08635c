//! 窗口与渲染器句柄的 Lua userdata
//!
//! 方法: `:destroy()`、`:is_valid()`；其余键走 `__index` 属性查询。

use mlua::{Lua, MetaMethod, UserData, UserDataMethods, Value};

use crate::platform::VideoBackend;
use crate::video::{PropertyValue, RendererHandle, WindowHandle};

fn property_to_lua(lua: &Lua, value: Option<PropertyValue>) -> mlua::Result<Value> {
    match value {
        Some(PropertyValue::Integer(i)) => Ok(Value::Integer(i)),
        Some(PropertyValue::String(s)) => Ok(Value::String(lua.create_string(&s)?)),
        None => Ok(Value::Nil),
    }
}

impl<B: VideoBackend + 'static> UserData for WindowHandle<B> {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method_mut("destroy", |_, this, ()| Ok(this.destroy()));

        methods.add_method("is_valid", |_, this, ()| Ok(this.is_valid()));

        methods.add_meta_method(MetaMethod::Index, |lua, this, key: String| {
            let value = this.property(&key)?;
            property_to_lua(lua, value)
        });

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!("{:?}", this))
        });
    }
}

impl<B: VideoBackend + 'static> UserData for RendererHandle<B> {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method_mut("destroy", |_, this, ()| Ok(this.destroy()));

        methods.add_method("is_valid", |_, this, ()| Ok(this.is_valid()));

        methods.add_meta_method(MetaMethod::Index, |lua, this, key: String| {
            let value = this.property(&key)?;
            property_to_lua(lua, value)
        });

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!("{:?}", this))
        });
    }
}
