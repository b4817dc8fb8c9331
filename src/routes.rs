use actix_web::web;

use crate::api::handlers::animal_handlers::{
    admin, delete_animal, home, list_animals, register_animal, register_form, update_animal, update_form,
};

pub fn public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(home))
    );

    cfg.service(
        web::resource("/animals/register")
            .route(web::get().to(register_form))
            .route(web::post().to(register_animal))
    );

    cfg.service(
        web::resource("/animals/list")
            .route(web::get().to(list_animals))
    );
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/animals/admin")
            .route(web::get().to(admin))
    );

    cfg.service(
        web::resource("/animals/delete/{id}")
            .route(web::post().to(delete_animal))
    );

    cfg.service(
        web::resource("/animals/update/{id}")
            .route(web::get().to(update_form))
            .route(web::post().to(update_animal))
    );
}
