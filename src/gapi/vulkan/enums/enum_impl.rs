/// Declares an enum whose variants map one-to-one onto Vulkan layer or extension names.
///
/// Every variant is bound to a static [`ExtensionName`](vulkanalia::vk::ExtensionName) so the
/// name has a stable address and can be handed to the driver as a NUL-terminated pointer.
#[macro_export]
macro_rules! enum_impl {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident {
            $(
                $(#[$inner:meta])*
                $variant:ident = $ext:expr,
            )+
        }
    ) => {
        $(#[$outer])*
        $enum_vis enum $name {
            $(
                $(#[$inner])*
                $variant,
            )+
        }

        impl $name {
            /// Returns the Vulkan name buffer with stable storage (good for comparisons).
            #[inline]
            pub fn name_buf(self) -> &'static ::vulkanalia::vk::ExtensionName {
                match self {
                    $(
                        Self::$variant => {
                            // One static per variant, stable address, not a temporary.
                            static BUF: ::vulkanalia::vk::ExtensionName = $ext;
                            &BUF
                        }
                    )+
                }
            }

            /// Returns the Vulkan name pointer for FFI (NUL-terminated).
            #[inline]
            pub fn name_ptr(self) -> *const ::std::ffi::c_char {
                self.name_buf().as_ptr()
            }

            /// The name as an owned string, the form capability sets are keyed by.
            #[inline]
            pub fn name(self) -> String {
                self.name_buf().to_string()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.name_buf())
            }
        }
    };
}
