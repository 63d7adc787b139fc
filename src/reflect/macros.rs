//! Registration macros for user models

/// Implements [`Describe`](crate::Describe) for a struct.
///
/// ```
/// use reflect_schema::describe_struct;
///
/// #[derive(Default)]
/// struct Config {
///     port: u16,
///     note: Option<String>,
/// }
///
/// describe_struct!(Config as "Ns.Config" with Config::default {
///     property port as "Port": u16,
///     field note: Option<String>,
/// });
/// ```
///
/// Members are enumerated in the order they are listed. `property` and `field`
/// select the documentation identifier prefix, `as "Name"` overrides the
/// exported member name, and `with <path>` registers a default constructor.
#[macro_export]
macro_rules! describe_struct {
    (@name $member:ident) => {
        stringify!($member)
    };
    (@name $member:ident $rename:literal) => {
        $rename
    };
    (@kind property) => {
        $crate::MemberKind::Property
    };
    (@kind field) => {
        $crate::MemberKind::Field
    };
    (
        $ty:ident as $full_name:literal $(with $ctor:path)? {
            $($kind:ident $member:ident $(as $rename:literal)? : $member_ty:ty),* $(,)?
        }
    ) => {
        impl $crate::Describe for $ty {
            fn describe() -> $crate::TypeDescriptor {
                fn members() -> ::std::vec::Vec<$crate::MemberDescriptor> {
                    ::std::vec![
                        $(
                            $crate::MemberDescriptor::new(
                                $crate::describe_struct!(@name $member $($rename)?),
                                $crate::describe_struct!(@kind $kind),
                                <$member_ty as $crate::Describe>::describe,
                                {
                                    fn read(
                                        instance: &dyn ::std::any::Any,
                                    ) -> $crate::Result<$crate::MemberValue<'_>> {
                                        match instance.downcast_ref::<$ty>() {
                                            Some(this) => {
                                                let value: &$member_ty = &this.$member;
                                                Ok($crate::MemberValue::Borrowed(value))
                                            }
                                            None => Err($crate::SchemaError::unreadable(
                                                $full_name,
                                                stringify!($member),
                                                "instance is not of the owning type",
                                            )),
                                        }
                                    }
                                    read
                                },
                            ),
                        )*
                    ]
                }

                let descriptor = $crate::TypeDescriptor::object::<$ty>($full_name, members);
                $(
                    fn construct() -> $crate::Result<::std::boxed::Box<dyn ::std::any::Any>> {
                        let value: $ty = $ctor();
                        let boxed: ::std::boxed::Box<dyn ::std::any::Any> =
                            ::std::boxed::Box::new(value);
                        Ok(boxed)
                    }
                    let descriptor = descriptor.constructible(construct);
                )?
                descriptor
            }
        }
    };
}

/// Implements [`Describe`](crate::Describe) for a fieldless enum.
///
/// ```
/// use reflect_schema::describe_enum;
///
/// #[derive(Default)]
/// enum Difficulty {
///     Easy,
///     #[default]
///     Normal,
///     Hard,
/// }
///
/// describe_enum!(Difficulty as "Ns.Difficulty" with Difficulty::default {
///     Easy,
///     Normal,
///     Hard as "HARD",
/// });
/// ```
///
/// Every variant must be listed; the listed order is the order of the
/// schema's `enum` array.
#[macro_export]
macro_rules! describe_enum {
    (
        $ty:ident as $full_name:literal $(with $ctor:path)? {
            $($variant:ident $(as $rename:literal)?),* $(,)?
        }
    ) => {
        impl $crate::Describe for $ty {
            fn describe() -> $crate::TypeDescriptor {
                fn name_of(
                    value: &dyn ::std::any::Any,
                ) -> ::std::option::Option<&'static str> {
                    match value.downcast_ref::<$ty>()? {
                        $($ty::$variant => Some($crate::describe_struct!(@name $variant $($rename)?)),)*
                    }
                }

                let descriptor = $crate::TypeDescriptor::enumeration::<$ty>(
                    $full_name,
                    &[$($crate::describe_struct!(@name $variant $($rename)?)),*],
                    name_of,
                );
                $(
                    fn construct() -> $crate::Result<::std::boxed::Box<dyn ::std::any::Any>> {
                        let value: $ty = $ctor();
                        let boxed: ::std::boxed::Box<dyn ::std::any::Any> =
                            ::std::boxed::Box::new(value);
                        Ok(boxed)
                    }
                    let descriptor = descriptor.constructible(construct);
                )?
                descriptor
            }
        }
    };
}
