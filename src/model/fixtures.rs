// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Small built-in catalogue: an order use case calling into cart and inventory services.

use super::{Dataset, FunctionKey, FunctionRecord};

fn key(value: &str) -> FunctionKey {
    FunctionKey::new(value).expect("fixture key")
}

fn method(
    full: &str,
    package: &str,
    receiver: &str,
    name: &str,
    file: &str,
    comment: &str,
) -> FunctionRecord {
    FunctionRecord::new(key(full), name, package, file)
        .with_receiver_type(Some(receiver))
        .with_doc_comment(Some(comment))
}

pub fn cart_service_dataset() -> Dataset {
    let create_order = method(
        "usecase.OrderCreateUseCase.CreateOrder",
        "usecase",
        "OrderCreateUseCase",
        "CreateOrder",
        "application/usecase/order_create.go",
        "CreateOrder creates an order from the customer's cart",
    )
    .with_called_functions([
        "uc.cartService.GetCart",
        "uc.inventoryService.ReserveStock",
        "uc.orderRepo.Create",
        "uc.cartService.ClearCart",
    ])
    .with_diagram_description(
        r#"flowchart TD
    N1(["`**OrderCreateUseCase.CreateOrder**`"])
    N2["cart, err := uc.cartService.GetCart(ctx, req.CartID)"]
    N3{{"err != nil"}}
    N4(["return nil, err"])
    N5["uc.inventoryService.ReserveStock(ctx, cart.Items)"]
    N6["uc.orderRepo.Create(ctx, order)"]
    N7["uc.cartService.ClearCart(ctx, cart.ID)"]
    N8(("end"))
    N1 --> N2
    N2 --> N3
    N3 --> |Yes| N4
    N3 --> |No| N5
    N5 --> N6
    N6 --> N7
    N7 --> N8
    click N2 "javascript:navigateToFunction('uc.cartService.GetCart')"
    click N5 "javascript:navigateToFunction('uc.inventoryService.ReserveStock')"
    click N6 "javascript:navigateToFunction('uc.orderRepo.Create')"
    click N7 "javascript:navigateToFunction('uc.cartService.ClearCart')"
"#,
    );

    let get_cart = method(
        "service.CartService.GetCart",
        "service",
        "CartService",
        "GetCart",
        "application/service/cart.go",
        "GetCart loads a cart by id and rejects empty carts",
    )
    .with_called_functions(["s.cartRepo.GetByID", "cart.IsEmpty"])
    .with_diagram_description(
        r#"flowchart TD
    N1(["`**CartService.GetCart**`"])
    N2["cart, err := s.cartRepo.GetByID(ctx, cartID)"]
    N3{{"err != nil"}}
    N4(["return nil, err"])
    N5{{"reject empty carts\ncart.IsEmpty()"}}
    N6(["return cart, nil"])
    N1 --> N2
    N2 --> N3
    N3 --> |Yes| N4
    N3 --> |No| N5
    N5 --> |No| N6
    click N2 "javascript:navigateToFunction('s.cartRepo.GetByID')"
    click N5 "javascript:navigateToFunction('cart.IsEmpty')"
"#,
    );

    let clear_cart = method(
        "service.CartService.ClearCart",
        "service",
        "CartService",
        "ClearCart",
        "application/service/cart.go",
        "ClearCart deletes the cart",
    )
    .with_called_functions(["s.cartRepo.Delete"])
    .with_diagram_description(
        r#"flowchart TD
    N1(["`**CartService.ClearCart**`"])
    N2(["return s.cartRepo.Delete(ctx, cartID)"])
    N3(("end"))
    N1 --> N2
    N2 --> N3
"#,
    );

    let reserve_stock = method(
        "service.InventoryService.ReserveStock",
        "service",
        "InventoryService",
        "ReserveStock",
        "application/service/inventory.go",
        "ReserveStock reserves stock for every cart item",
    )
    .with_called_functions(["s.inventoryRepo.Reserve"])
    .with_diagram_description(
        r#"flowchart TD
    N1(["`**InventoryService.ReserveStock**`"])
    N2["for _, item := range items"]
    N3["s.inventoryRepo.Reserve(ctx, item.ProductID, item.Quantity)"]
    N4(("end"))
    N1 --> N2
    N2 --> N3
    N3 --> N4
"#,
    );

    let is_empty = FunctionRecord::new(
        key("entity.Cart.IsEmpty"),
        "IsEmpty",
        "entity",
        "domain/entity/cart.go",
    )
    .with_receiver_type(Some("Cart"))
    .with_diagram_description(
        r#"flowchart TD
    N1(["`**Cart.IsEmpty**`"])
    N2(["return len(c.Items) == 0"])
    N1 --> N2
"#,
    );

    let new_cart_service = FunctionRecord::new(
        key("service.NewCartService"),
        "NewCartService",
        "service",
        "application/service/cart.go",
    )
    .with_doc_comment(Some("NewCartService constructor"))
    .with_diagram_description("flowchart TD\n    N1([\"`**NewCartService**`\"])\n");

    Dataset::from_records([
        create_order,
        get_cart,
        clear_cart,
        reserve_stock,
        is_empty,
        new_cart_service,
    ])
    .expect("fixture keys are unique")
}
