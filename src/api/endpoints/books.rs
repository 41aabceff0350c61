use crate::api::client::ApiClient;
use crate::api::models::{
    Book, BookQuery, BookStatus, CreateBookRequest, Envelope, ListEnvelope, MessageResponse,
    Page, UpdateBookRequest,
};
use crate::core::error::Result;

impl ApiClient {
    /// `GET /books` with search, genre, status and paging filters
    pub async fn list_books(&self, query: &BookQuery) -> Result<Page<Book>> {
        self.get_with("/books", query).await
    }

    pub async fn get_book(&self, id: i64) -> Result<Book> {
        let envelope: Envelope<Book> = self.get(&format!("/books/{}", id)).await?;
        Ok(envelope.data)
    }

    pub async fn create_book(&self, book: &CreateBookRequest) -> Result<Book> {
        let envelope: Envelope<Book> = self.post("/books", book).await?;
        Ok(envelope.data)
    }

    pub async fn update_book(&self, id: i64, update: &UpdateBookRequest) -> Result<Book> {
        let envelope: Envelope<Book> = self.put(&format!("/books/{}", id), update).await?;
        Ok(envelope.data)
    }

    pub async fn delete_book(&self, id: i64) -> Result<MessageResponse> {
        self.delete(&format!("/books/{}", id)).await
    }

    /// Books the signed-in user lends out, optionally narrowed by status
    pub async fn my_books(&self, status: Option<BookStatus>) -> Result<Vec<Book>> {
        let list: ListEnvelope<Book> = match status {
            Some(status) => {
                self.get_with("/books/my-books", &[("status", status.as_str())])
                    .await?
            }
            None => self.get("/books/my-books").await?,
        };
        Ok(list.data)
    }

    /// Books currently lent to the signed-in user
    pub async fn my_borrowed(&self) -> Result<Vec<Book>> {
        let list: ListEnvelope<Book> = self.get("/books/my-borrowed").await?;
        Ok(list.data)
    }

    /// Lender-side "mark returned" for a borrowed book
    pub async fn mark_book_returned(&self, id: i64) -> Result<Book> {
        let envelope: Envelope<Book> = self.put_empty(&format!("/books/{}/return", id)).await?;
        Ok(envelope.data)
    }

    /// Distinct genres present in the catalog
    pub async fn genres(&self) -> Result<Vec<String>> {
        let envelope: Envelope<Vec<String>> = self.get("/books/genres").await?;
        Ok(envelope.data)
    }
}
