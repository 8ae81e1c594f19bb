//! Document assembly
//!
//! Pure string layout of the amalgamated header. Fragment text is copied as
//! is; the only structure added is the two guards and the optional header
//! block.

use singlehdr_core::SourceFragment;

/// Lays out ordered fragments inside the outer and implementation guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAssembler {
    include_guard: String,
    impl_define: String,
    additional_header: Option<String>,
}

impl DocumentAssembler {
    pub fn new(include_guard: impl Into<String>, impl_define: impl Into<String>) -> Self {
        Self {
            include_guard: include_guard.into(),
            impl_define: impl_define.into(),
            additional_header: None,
        }
    }

    /// Inject `header` verbatim right after the outer guard
    pub fn with_additional_header(mut self, header: impl Into<String>) -> Self {
        self.additional_header = Some(header.into());
        self
    }

    pub fn set_additional_header(&mut self, header: Option<String>) {
        self.additional_header = header;
    }

    /// Produce the final document
    pub fn assemble(&self, public: &[&SourceFragment], private: &[&SourceFragment]) -> String {
        let mut out = String::new();

        out.push_str(&format!("#ifndef {}\n", self.include_guard));
        out.push_str(&format!("#define {}\n\n", self.include_guard));

        if let Some(header) = &self.additional_header {
            out.push_str(header);
            out.push_str("\n\n");
        }

        for fragment in public {
            out.push_str(fragment.text());
            out.push('\n');
        }

        out.push_str(&format!("#ifdef {}\n\n", self.impl_define));

        for fragment in private {
            out.push_str(fragment.text());
            out.push('\n');
        }

        out.push_str(&format!("#endif // {}\n\n", self.impl_define));
        out.push_str(&format!("#endif // {}\n", self.include_guard));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use singlehdr_core::FileId;

    fn fragment(name: &str, body: &str) -> SourceFragment {
        SourceFragment::new(FileId::new(name), format!("// {}\n\n{}\n", name, body), vec![])
    }

    #[test]
    fn test_empty_document() {
        let assembler = DocumentAssembler::new("SINGLE_HPP", "Single_IMPL");

        assert_eq!(
            assembler.assemble(&[], &[]),
            "#ifndef SINGLE_HPP\n\
             #define SINGLE_HPP\n\
             \n\
             #ifdef Single_IMPL\n\
             \n\
             #endif // Single_IMPL\n\
             \n\
             #endif // SINGLE_HPP\n"
        );
    }

    #[test]
    fn test_one_header() {
        let assembler = DocumentAssembler::new("SINGLE_HPP", "Single_IMPL");
        let f1 = fragment("Test1.hpp", "void f1();");

        assert_eq!(
            assembler.assemble(&[&f1], &[]),
            "#ifndef SINGLE_HPP\n\
             #define SINGLE_HPP\n\
             \n\
             // Test1.hpp\n\
             \n\
             void f1();\n\
             \n\
             #ifdef Single_IMPL\n\
             \n\
             #endif // Single_IMPL\n\
             \n\
             #endif // SINGLE_HPP\n"
        );
    }

    #[test]
    fn test_private_region() {
        let assembler = DocumentAssembler::new("LIB_HPP", "LIB_IMPL");
        let header = fragment("lib/A.hpp", "void a();");
        let source = fragment("lib/A.cpp", "void a() {}");

        assert_eq!(
            assembler.assemble(&[&header], &[&source]),
            "#ifndef LIB_HPP\n\
             #define LIB_HPP\n\
             \n\
             // lib/A.hpp\n\
             \n\
             void a();\n\
             \n\
             #ifdef LIB_IMPL\n\
             \n\
             // lib/A.cpp\n\
             \n\
             void a() {}\n\
             \n\
             #endif // LIB_IMPL\n\
             \n\
             #endif // LIB_HPP\n"
        );
    }

    #[test]
    fn test_additional_header() {
        let assembler = DocumentAssembler::new("SINGLE_HPP", "Single_IMPL")
            .with_additional_header("/*\n * This is a comment.\n */\n");
        let f1 = fragment("Test1.hpp", "void f1();");

        assert_eq!(
            assembler.assemble(&[&f1], &[]),
            "#ifndef SINGLE_HPP\n\
             #define SINGLE_HPP\n\
             \n\
             /*\n * This is a comment.\n */\n\
             \n\
             \n\
             // Test1.hpp\n\
             \n\
             void f1();\n\
             \n\
             #ifdef Single_IMPL\n\
             \n\
             #endif // Single_IMPL\n\
             \n\
             #endif // SINGLE_HPP\n"
        );
    }

    #[test]
    fn test_origin_only_fragment() {
        let assembler = DocumentAssembler::new("G", "I");
        let root = SourceFragment::new(FileId::new("Root.hpp"), "// Root.hpp\n", vec![]);

        assert_eq!(
            assembler.assemble(&[&root], &[]),
            "#ifndef G\n#define G\n\n// Root.hpp\n\n#ifdef I\n\n#endif // I\n\n#endif // G\n"
        );
    }
}
