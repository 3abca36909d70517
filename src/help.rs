use std::ffi::OsStr;

use crate::schema::Schema;

#[inline(never)]
fn push_str(out: &mut String, s: &str) {
    out.push_str(s);
}

#[cold]
pub(crate) fn render_help_into(out: &mut String, program: &OsStr, schema: &Schema) {
    macro_rules! w {
        ($($e:expr),*) => {{
            $(push_str(out, $e);)*
        }};
    }

    w!("Usage: ", &program.to_string_lossy());
    if !schema.is_empty() {
        w!(" [OPTIONS]");
    }
    w!("\n");

    if schema.is_empty() {
        return;
    }

    w!("\nOptions:\n");
    for spec in schema {
        w!("  ", &spec.description(), "\n");
        for line in spec.get_help().split_terminator('\n') {
            w!("          ", line, "\n");
        }
        w!("\n");
    }
}
