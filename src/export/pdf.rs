use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs;
use std::path::Path;

const FONT: Name<'static> = Name(b"F1");

/// Page geometry and type sizes, in points.
#[derive(Debug, Clone, Copy)]
struct Layout {
    width: f32,
    height: f32,
    margin: f32,
    row_h: f32,
    line_h: f32,
    body_size: f32,
    header_size: f32,
    title_size: f32,
}

const A4_PORTRAIT: Layout = Layout {
    width: 595.0,
    height: 842.0,
    margin: 50.0,
    row_h: 20.0,
    line_h: 16.0,
    body_size: 10.0,
    header_size: 11.0,
    title_size: 14.0,
};

/// Grey level of the header band and of every other body row.
const HEADER_FILL: (f32, f32, f32) = (0.85, 0.87, 0.90);
const BAND_FILL: (f32, f32, f32) = (0.96, 0.96, 0.96);

/// Minimal table writer on top of `pdf_writer`: one Helvetica font, a
/// title on every page and a page number in the footer.
pub struct PdfManager {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    page_refs: Vec<Ref>,
    layout: Layout,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        Self {
            pdf,
            next_id: 4,
            catalog_id,
            pages_id,
            font_id,
            page_refs: Vec::new(),
            layout: A4_PORTRAIT,
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    /// Register a new page; returns its empty content stream and the id the
    /// stream must be written under.
    fn open_page(&mut self) -> (Content, Ref) {
        let page_id = self.alloc();
        let content_id = self.alloc();
        let l = self.layout;

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, l.width, l.height))
            .contents(content_id);
        page.resources().fonts().pair(FONT, self.font_id);
        drop(page);

        self.page_refs.push(page_id);
        (Content::new(), content_id)
    }

    fn text(content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        content.begin_text();
        content.set_font(FONT, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&pdf_text(text)));
        content.end_text();
    }

    fn fill(content: &mut Content, (r, g, b): (f32, f32, f32), x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_fill_rgb(r, g, b);
        content.rect(x, y, w, h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn cells<S: AsRef<str>>(&self, content: &mut Content, y: f32, widths: &[f32], cells: &[S], size: f32) {
        let mut x = self.layout.margin;
        for (cell, &w) in cells.iter().zip(widths) {
            Self::text(content, x + 4.0, y + 5.0, size, cell.as_ref());
            content.save_state();
            content.set_stroke_rgb(0.65, 0.65, 0.65);
            content.rect(x, y, w, self.layout.row_h);
            content.stroke();
            content.restore_state();
            x += w;
        }
    }

    /// Widths proportional to the longest text of each column, shrunk to
    /// fit between the margins.
    fn column_widths(&self, headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * 6.5)
            .collect();
        for row in rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = w.max(cell.chars().count() as f32 * 6.2);
            }
        }

        let available = self.layout.width - 2.0 * self.layout.margin;
        let total: f32 = widths.iter().sum();
        if total > available {
            let k = available / total;
            widths.iter_mut().for_each(|w| *w *= k);
        }
        widths
    }

    /// Multi-page table. `preamble` lines are printed once, between the
    /// title and the table on the first page.
    pub fn write_table(
        &mut self,
        title: &str,
        preamble: &[String],
        headers: &[&str],
        rows: &[Vec<String>],
    ) {
        let l = self.layout;
        let widths = self.column_widths(headers, rows);
        let table_w: f32 = widths.iter().sum();

        let mut rest = rows;
        let mut page_no = 1usize;

        loop {
            let (mut content, content_id) = self.open_page();

            Self::text(&mut content, l.margin, l.height - l.margin + 15.0, l.title_size, title);
            Self::text(
                &mut content,
                l.width - l.margin - 60.0,
                l.margin - 35.0,
                l.body_size,
                &format!("Page {page_no}"),
            );

            let mut y = l.height - l.margin - 30.0;
            if page_no == 1 && !preamble.is_empty() {
                for line in preamble {
                    Self::text(&mut content, l.margin, y + 5.0, l.body_size, line);
                    y -= l.line_h;
                }
                y -= l.line_h;
            }

            Self::fill(&mut content, HEADER_FILL, l.margin, y, table_w, l.row_h);
            self.cells(&mut content, y, &widths, headers, l.header_size);
            y -= l.row_h;

            let capacity = (((y - l.margin) / l.row_h).floor().max(1.0)) as usize;
            let (page_rows, next) = rest.split_at(capacity.min(rest.len()));

            for (i, row) in page_rows.iter().enumerate() {
                if i % 2 == 0 {
                    Self::fill(&mut content, BAND_FILL, l.margin, y, table_w, l.row_h);
                }
                self.cells(&mut content, y, &widths, row.as_slice(), l.body_size);
                y -= l.row_h;
            }

            self.pdf.stream(content_id, &content.finish());
            rest = next;
            page_no += 1;

            if rest.is_empty() {
                break;
            }
        }
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .count(self.page_refs.len() as i32)
            .kids(self.page_refs.iter().copied());
        fs::write(path, self.pdf.finish())
    }
}

/// Helvetica only covers Latin-1; anything else is shown as `?`.
fn pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
