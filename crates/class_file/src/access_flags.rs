use bitflags::bitflags;

bitflags! {
    /// `access_flags` of a class, field or method. Some bits mean different
    /// things depending on where they appear (0x0040 is `volatile` on a field
    /// and a bridge marker on a method), so the names follow fields and methods.
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MANDATED = 0x8000;
    }
}

impl AccessFlags {
    /// Source modifiers of a field, e.g. `private static final`.
    pub fn field_keywords(&self) -> String {
        self.keywords(&[
            (AccessFlags::VOLATILE, "volatile"),
            (AccessFlags::TRANSIENT, "transient"),
        ])
    }

    /// Source modifiers of a method, e.g. `public abstract`.
    pub fn method_keywords(&self) -> String {
        self.keywords(&[
            (AccessFlags::SYNCHRONIZED, "synchronized"),
            (AccessFlags::NATIVE, "native"),
            (AccessFlags::ABSTRACT, "abstract"),
            (AccessFlags::STRICT, "strictfp"),
        ])
    }

    fn keywords(&self, specific: &[(AccessFlags, &'static str)]) -> String {
        let common = [
            (AccessFlags::PUBLIC, "public"),
            (AccessFlags::PRIVATE, "private"),
            (AccessFlags::PROTECTED, "protected"),
            (AccessFlags::STATIC, "static"),
            (AccessFlags::FINAL, "final"),
        ];

        common
            .iter()
            .chain(specific)
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, keyword)| *keyword)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
