use super::models::{Book, BookDto};

/// Field-by-field translation between [`Book`] and [`BookDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BookMapper;

impl BookMapper {
    pub fn to_dto(&self, book: &Book) -> BookDto {
        BookDto {
            google_id: book.google_id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            categories: book.categories.clone(),
        }
    }

    /// The resulting book has no internal id.
    pub fn to_domain(&self, dto: &BookDto) -> Book {
        Book {
            id: None,
            google_id: dto.google_id.clone(),
            title: dto.title.clone(),
            author: dto.author.clone(),
            categories: dto.categories.clone(),
        }
    }

    pub fn to_dto_list(&self, books: &[Book]) -> Vec<BookDto> {
        books.iter().map(|book| self.to_dto(book)).collect()
    }
}
