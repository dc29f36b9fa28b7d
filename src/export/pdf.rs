//! Small text-only PDF generator for report downloads.
//!
//! Emits PDF 1.4 with the built-in Helvetica font, A4 pages and
//! absolutely positioned lines. Characters outside printable ASCII are
//! replaced with `?` so the escape rules stay trivial.

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const LEADING: f32 = 1.4;

enum Element {
    Line { size: f32, text: String },
    Gap(f32),
}

struct Placed {
    y: f32,
    size: f32,
    text: String,
}

/// Accumulates styled lines and renders them into PDF bytes.
pub struct PdfBuilder {
    elements: Vec<Element>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// 18pt line followed by a blank gap
    pub fn title(&mut self, text: &str) -> &mut Self {
        self.line(18.0, text);
        self.gap()
    }

    /// 14pt section heading
    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.line(14.0, text)
    }

    /// 10pt body line
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.line(10.0, text)
    }

    pub fn line(&mut self, size: f32, text: &str) -> &mut Self {
        self.elements.push(Element::Line {
            size,
            text: text.to_string(),
        });
        self
    }

    pub fn gap(&mut self) -> &mut Self {
        self.elements.push(Element::Gap(12.0));
        self
    }

    /// Lays lines out top to bottom, breaking onto a new page when the
    /// bottom margin is reached, and serializes the document.
    pub fn build(&self) -> Vec<u8> {
        let top = PAGE_HEIGHT - MARGIN;
        let mut pages: Vec<Vec<Placed>> = Vec::new();
        let mut current: Vec<Placed> = Vec::new();
        let mut y = top;

        for element in &self.elements {
            match element {
                Element::Gap(height) => y -= height,
                Element::Line { size, text } => {
                    let advance = size * LEADING;
                    if y - advance < MARGIN && !current.is_empty() {
                        pages.push(std::mem::take(&mut current));
                        y = top;
                    }
                    y -= advance;
                    current.push(Placed {
                        y,
                        size: *size,
                        text: sanitize(text),
                    });
                }
            }
        }
        pages.push(current);

        serialize(&pages)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes the string-literal delimiters and flattens everything
/// non-ASCII to `?`.
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize, body: &str) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    out.extend_from_slice(body.as_bytes());
    out.extend_from_slice(b"endobj\n");
}

/// Objects are numbered 1 catalog, 2 page tree, 3 font, then a page
/// and content stream pair per page. The cross-reference table points
/// at the byte offset each object was written at.
fn serialize(pages: &[Vec<Placed>]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n");

    push_object(&mut out, &mut offsets, 1, "<< /Type /Catalog /Pages 2 0 R >>\n");

    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    push_object(
        &mut out,
        &mut offsets,
        2,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>\n",
            kids.join(" "),
            pages.len()
        ),
    );

    push_object(
        &mut out,
        &mut offsets,
        3,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\n",
    );

    for (i, page) in pages.iter().enumerate() {
        let page_id = 4 + 2 * i;
        let content_id = page_id + 1;

        push_object(
            &mut out,
            &mut offsets,
            page_id,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>\n"
            ),
        );

        let mut content = String::new();
        for line in page {
            content.push_str(&format!(
                "BT\n/F1 {} Tf\n1 0 0 1 {} {} Tm\n({}) Tj\nET\n",
                line.size, MARGIN, line.y, line.text
            ));
        }
        push_object(
            &mut out,
            &mut offsets,
            content_id,
            &format!(
                "<< /Length {} >>\nstream\n{}endstream\n",
                content.len(),
                content
            ),
        );
    }

    let object_count = offsets.len();
    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}
