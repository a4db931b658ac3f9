/// Declare an abstract family of mapped types.
///
/// The family is a trait extending [`Entity`](crate::descriptor::Entity).
/// The macro describes `dyn Family` as an abstract type with the listed
/// concrete subtypes, and lets `Box<dyn Family>` be used as a property type.
///
/// ```
/// use docmapper::prelude::*;
///
/// trait Contact: Entity {}
///
/// #[derive(Debug, Default)]
/// struct EmailContact {
///     email: String,
/// }
///
/// impl Contact for EmailContact {}
///
/// impl Describe for EmailContact {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>()
///             .field("email", |c| &c.email, |c| &mut c.email)
///             .payload(PayloadOptions::new())
///             .build()
///     }
/// }
///
/// docmapper::polymorphic!(dyn Contact => EmailContact);
///
/// let class = ClassRef::of::<dyn Contact>();
/// assert!(class.describe().is_abstract());
/// ```
#[macro_export]
macro_rules! polymorphic {
    (dyn $family:ident => $($subtype:ty),+ $(,)?) => {
        impl $crate::descriptor::Describe for dyn $family {
            fn describe() -> $crate::descriptor::TypeDescriptor {
                $crate::descriptor::TypeDescriptor::family::<dyn $family>()
                    $(.subtype::<$subtype>())+
                    .build()
            }
        }

        impl $crate::value::PropertyValue for ::std::boxed::Box<dyn $family> {
            fn declared_type() -> $crate::descriptor::DeclaredType {
                $crate::descriptor::DeclaredType::Class(
                    $crate::descriptor::ClassRef::of::<dyn $family>(),
                )
            }

            fn to_field(&self) -> $crate::value::FieldRef<'_> {
                $crate::value::FieldRef::Object($crate::descriptor::Entity::as_entity(&**self))
            }

            fn from_field(
                value: $crate::value::FieldValue,
            ) -> $crate::error::Result<::std::boxed::Box<dyn $family>> {
                let entity = value.into_entity(stringify!($family))?;
                let found = $crate::descriptor::Entity::class(&*entity);
                let any = $crate::descriptor::Entity::into_any(entity);
                $(
                    let any = match any.downcast::<$subtype>() {
                        Ok(concrete) => return Ok(concrete as ::std::boxed::Box<dyn $family>),
                        Err(any) => any,
                    };
                )+
                drop(any);
                Err($crate::error::MapperError::value(format!(
                    "type [{}] is not a subtype of [{}]",
                    found,
                    stringify!($family)
                )))
            }
        }
    };
}
